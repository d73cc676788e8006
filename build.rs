use vergen_gix::{BuildBuilder, Emitter, GixBuilder, RustcBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_timestamp(true).build()?;
    let gix = GixBuilder::default()
        .sha(true)
        .commit_timestamp(true)
        .dirty(true)
        .build()?;
    let rustc = RustcBuilder::default().semver(true).channel(true).build()?;

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&gix)?
        .add_instructions(&rustc)?
        .emit()?;

    Ok(())
}
