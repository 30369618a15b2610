use vergen::{BuildBuilder, CargoBuilder, Emitter};
use vergen_git2::Git2Builder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::all_build()?;
    let cargo = CargoBuilder::all_cargo()?;

    // crates.io tarballs carry no .git; fall back to placeholder values
    let git2_result = Git2Builder::default()
        .describe(true, true, None)
        .sha(true)
        .build();

    if let Ok(git2) = git2_result {
        Emitter::default()
            .add_instructions(&build)?
            .add_instructions(&cargo)?
            .add_instructions(&git2)?
            .emit()?;
    } else {
        println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=unknown");
        println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");

        Emitter::default()
            .add_instructions(&build)?
            .add_instructions(&cargo)?
            .emit()?;
    }

    Ok(())
}
