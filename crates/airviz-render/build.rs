// File: crates/airviz-render/build.rs
// Summary: Link the Windows system libraries Skia/ICU need when the `skia` feature is on.

fn main() {
    #[cfg(target_os = "windows")]
    {
        if std::env::var_os("CARGO_FEATURE_SKIA").is_some() {
            // RegOpenKeyExW, RegQueryInfoKeyW, etc.
            println!("cargo:rustc-link-lib=advapi32");
        }
    }
}
