pub fn get_version_string() -> String {
    format!(
        "{} v{} (rustc {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_RUSTC_SEMVER")
    )
}

pub fn get_build_timestamp() -> &'static str {
    env!("VERGEN_BUILD_TIMESTAMP")
}
