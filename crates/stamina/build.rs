//! Build script for launcher build identity

fn main() {
    println!(
        "cargo:rustc-env=STAMINA_BUILD_DATE={}",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    // TARGET is only visible to build scripts; forward it to the crate.
    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=STAMINA_TARGET={target}");
    }

    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            let rev = String::from_utf8_lossy(&output.stdout);
            println!("cargo:rustc-env=STAMINA_GIT_REV={}", rev.trim());
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
}
