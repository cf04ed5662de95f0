use std::env;
use std::path::Path;

// ffmpeg-sys-next finds FFmpeg through pkg-config everywhere but Windows.
// There it needs FFMPEG_DIR, so point at a vcpkg install if one exists.
fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }
    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!("cargo:warning=framedump: set FFMPEG_DIR to an FFmpeg install (for example a vcpkg x64-windows tree)");
        return;
    };

    let candidate = Path::new(&vcpkg_root).join("installed").join("x64-windows");
    if candidate.join("include").join("libavformat").exists() {
        println!(
            "cargo:warning=framedump: FFMPEG_DIR is unset; found FFmpeg at {}, export FFMPEG_DIR={} to use it",
            candidate.display(),
            candidate.display(),
        );
    } else {
        println!(
            "cargo:warning=framedump: no FFmpeg under {}; install it with `vcpkg install ffmpeg:x64-windows`",
            candidate.display(),
        );
    }
}
