// build.rs

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // The mock-only build links no system graphics libraries.
    if std::env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    // EGL and libwayland-client are linked by the khronos-egl and wayland-sys
    // build scripts. The fixed-function GLES 1 entry points are declared in
    // src/gl/gles1.rs without a #[link] attribute, so they are resolved here.
    // Try pkg-config first and fall back to plain linker flags.
    match pkg_config::probe_library("glesv1_cm") {
        Ok(_) => {
            eprintln!("pkg-config found glesv1_cm. Linking configured automatically.");
        }
        Err(err) => {
            eprintln!(
                "pkg-config failed for library 'glesv1_cm' ({}). Falling back to manual linking.",
                err
            );
            println!("cargo:rustc-link-lib=GLESv1_CM");
            println!("cargo:rustc-link-search=/usr/lib");
            eprintln!(
                "Manual linking flags applied. \
                 Ensure the GLES 1 (libGLESv1_CM) development library is installed."
            );
        }
    }
}
