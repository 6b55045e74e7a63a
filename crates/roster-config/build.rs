fn main() {
    // option_env!() values are baked in at compile time; rebuild when they change.
    println!("cargo:rerun-if-env-changed=ROSTER_COLLECTION");
    println!("cargo:rerun-if-env-changed=ROSTER_DOWNLOAD_BASE_URL");
}
