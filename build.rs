fn main() {
    // ESP-IDF sysenv propagation only applies to device builds; host builds
    // (tests, simulation) have nothing to emit.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
