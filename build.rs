fn main() {
    use vergen::{BuildBuilder, CargoBuilder, Emitter};

    // Only what `vibeflicks --version` prints.
    let build = BuildBuilder::default().build_timestamp(true).build();
    let cargo = CargoBuilder::default().target_triple(true).build();

    let mut emitter = Emitter::default();
    if let Ok(build) = &build {
        let _ = emitter.add_instructions(build);
    }
    if let Ok(cargo) = &cargo {
        let _ = emitter.add_instructions(cargo);
    }

    if let Err(e) = emitter.emit() {
        eprintln!("vergen emit skipped: {e}");
    }
}
