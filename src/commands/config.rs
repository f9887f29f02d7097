use anyhow::Result;
use owo_colors::OwoColorize;
use plancal_core::config::PlanCalConfig;

pub fn run(key: Option<&str>, value: Option<&str>) -> Result<()> {
    let config_path = PlanCalConfig::config_path()?;
    let mut config = PlanCalConfig::load()?;

    if let (Some(key), Some(value)) = (key, value) {
        config.set(key, value)?;
        config.save()?;
        log::debug!("Set {} in {}", key, config_path.display());
        println!("{} {} = {}", "~".yellow(), key, value);
        return Ok(());
    }

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", config.data_path().display());

    println!("{}", "Settings".bold());
    println!("  timezone:              {}", config.timezone.as_deref().unwrap_or("system").dimmed());
    println!("  week_start:            {}", config.week_start.as_str());
    println!("  default_platform:      {}", config.default_platform);
    println!("  default_status:        {}", config.default_status);
    println!("  default_content_type:  {}", config.default_content_type);
    println!("  company:               {}", config.company);
    println!("  user:                  {}", config.user.as_deref().unwrap_or("-").dimmed());

    Ok(())
}
