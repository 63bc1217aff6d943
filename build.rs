fn main() {
    // Exports the ESP-IDF build environment when targeting espidf;
    // a no-op for host builds.
    embuild::espidf::sysenv::output();
}
