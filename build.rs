// ISR Handoff Lab - Build Script
//
// Forwards the ESP-IDF environment to the linker when building firmware.

fn main() {
    // ESP-IDF environment setup (only meaningful for the espidf target)
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    println!("cargo:rustc-env=VERSION_STRING=ISR Handoff Lab v{}", env!("CARGO_PKG_VERSION"));
    println!("cargo:rerun-if-changed=build.rs");
}
