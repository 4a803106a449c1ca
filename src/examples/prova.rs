/// Reference scenario: 10 × 20 domain, three police vessels, ships drifting along +x.
///     An optional JSON file overrides any subset of the parameters.
pub fn run(config_path: Option<&std::path::Path>) -> anyhow::Result<()> {
    use anyhow::Context;

    use crate::scenario::ScenarioConfig;

    let config = match config_path {
        Some(path) => ScenarioConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ScenarioConfig::default(),
    };

    let output_path = std::path::Path::new("output/pirates");
    crate::tasks::pirates::run(&config, output_path)?;
    Ok(())
}
