fn main() {
    // Only the device build needs the ESP-IDF environment; host builds
    // (unit and integration tests) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
