use anyhow::Error;

use sample_config::ConfigBuilder;

fn main() -> Result<(), Error> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let manifest = args
        .next()
        .unwrap_or_else(|| "sampleReadGroupInfo.txt".to_string());
    let output = args.next().unwrap_or_else(|| "config.json".to_string());

    println!("Processing: {manifest}");

    ConfigBuilder::new(manifest, &output).build()?;

    println!("wrote {output}");
    Ok(())
}
