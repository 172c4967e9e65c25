fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .type_attribute(".user", "#[derive(serde::Serialize)]")
        .compile_protos(&["proto/user.proto"], &["proto"])?;
    Ok(())
}
