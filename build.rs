fn main() {
    println!("cargo:rerun-if-env-changed=PARASOL_BUILD");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let build_id = match std::env::var("PARASOL_BUILD") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => target_triple_label(),
    };
    println!("cargo:rustc-env=PARASOL_BUILD={}", build_id);

    let sha = git_short_sha()
        .or_else(|| short_hex(&std::env::var("GITHUB_SHA").unwrap_or_default()))
        .unwrap_or_default();
    println!("cargo:rustc-env=PARASOL_GIT_SHA={}", sha);
}

fn short_hex(raw: &str) -> Option<String> {
    let short: String = raw.trim().chars().take(7).collect();
    if short.is_empty() || !short.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(short.to_ascii_lowercase())
}

fn git_short_sha() -> Option<String> {
    let out = std::process::Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    short_hex(&String::from_utf8(out.stdout).ok()?)
}

fn target_triple_label() -> String {
    let os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| "unknown".to_string());
    let os = if os == "macos" { "darwin".to_string() } else { os };
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".to_string());
    format!("{os}-{arch}")
}
