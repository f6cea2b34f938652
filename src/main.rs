use facility_telemetry::config::Config;
use facility_telemetry::db::backend;
use facility_telemetry::services::{queries, seed};
use log::{error, info};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.json";

pub fn run(config_path: &Path) -> Result<(), String> {
    // 1) Load and validate config
    let cfg = Config::from_file(config_path).map_err(|e| e.to_string())?;
    info!(
        "Config loaded from {} (backend={}, groups={}, params={}, seed_on_first_run={}, seed_hours={}, seed_step_minutes={})",
        config_path.display(),
        cfg.db.kind(),
        cfg.groups.len(),
        if cfg.params.is_empty() {
            "default".to_string()
        } else {
            cfg.params.len().to_string()
        },
        cfg.seed_on_first_run,
        cfg.seed_hours,
        cfg.seed_step_minutes
    );

    // 2) Connect to the configured backend
    let mut conn = backend::establish(&cfg.db).map_err(|e| e.to_string())?;
    info!("Connected to {} backend", cfg.db.kind());

    // 3) Ensure schema (idempotent) before anything touches the tables
    backend::init_schema(&mut conn).map_err(|e| e.to_string())?;
    info!("Schema ready");

    // 4) First-run seeding, gated on both tables being empty
    let (state_rows, param_rows) = seed::seed_if_needed(&mut conn, &cfg).map_err(|e| e.to_string())?;
    if state_rows + param_rows > 0 {
        info!("Seeded store with {} state rows and {} parameter rows", state_rows, param_rows);
    }

    // 5) Snapshot so operators can eyeball the store before pointing the
    //    dashboard at it
    let states = queries::latest_device_states(&mut conn).map_err(|e| e.to_string())?;
    let params = queries::latest_params(&mut conn).map_err(|e| e.to_string())?;
    info!(
        "Store ready: {} catalog device(s), {} device key(s) with data, {} parameter(s) with data",
        queries::list_devices(&cfg).len(),
        states.len(),
        params.len()
    );
    for state in &states {
        info!("  [{}] {} = {} @ {}", state.group, state.device, state.status, state.ts);
    }
    for param in &params {
        info!("  {} = {:.3} @ {}", param.param, param.value, param.ts);
    }

    Ok(())
}

fn parse_config_path() -> Result<PathBuf, String> {
    let mut args = std::env::args_os();
    args.next(); // skip program name

    let mut config_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--config") => {
                if config_path.is_some() {
                    return Err("`--config` provided more than once".to_string());
                }
                let value = args
                    .next()
                    .ok_or_else(|| "`--config` requires a path argument".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            Some(s) if s.starts_with("--config=") => {
                if config_path.is_some() {
                    return Err("`--config` provided more than once".to_string());
                }
                let path_str = &s["--config=".len()..];
                if path_str.is_empty() {
                    return Err("`--config` requires a path argument".to_string());
                }
                config_path = Some(PathBuf::from(path_str));
            }
            Some("--") => break,
            Some(other) => return Err(format!("unrecognised argument: {}", other)),
            None => return Err("argument contains invalid UTF-8".to_string()),
        }
    }

    Ok(config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)))
}

fn main() {
    let config_path = match parse_config_path() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    info!(
        "facility-telemetry {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run(&config_path) {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
