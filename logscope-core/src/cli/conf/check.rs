use crate::conf::{ConfigError, load_config};
use std::error::Error;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool, json: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!("✔ {} rows per chunk", cfg.load_limit());
            println!("✔ {} rows per page", cfg.per_page());
            println!("✔ time column \"{}\"", cfg.query.time_column);
            println!(
                "✔ default interval {} ({})",
                cfg.default_preset().token,
                cfg.default_preset().label
            );
            println!("✔ field delimiter '{}'", cfg.field_delimiter());
            Ok(())
        }
        Err(err) => {
            print_config_error(err, plain, json)?;
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: ConfigError, plain: bool, json: bool) -> anyhow::Result<()> {
    let hint = config_error_hint(&err);

    match &err {
        ConfigError::Validation { report } if json => println!("{}", report.render_json()?),
        ConfigError::Validation { report } if plain => report.render_plain(),
        ConfigError::Validation { report } => report.render_pretty(),
        _ => {
            eprintln!("{err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
        }
    }

    if let Some(hint) = hint {
        eprintln!();
        eprintln!("{}", hint);
    }
    Ok(())
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // File errors
        //---------------------------------------------------------------------
        ConfigError::ReadFile { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            Some(
                "No logscope.hcl was found at this path.\n\
                 \n\
                 Pass the file itself or the directory holding it. Every key is\n\
                 optional, so an empty file is a valid configuration.",
            )
        }

        ConfigError::Parse { .. } => Some(
            "The file must be HCL with the blocks `pagination`, `query` and `url`.\n\
             \n\
             Example:\n\
             \n\
             pagination {\n\
               load_limit       = 1000\n\
               default_per_page = 50\n\
             }\n\
             \n\
             query {\n\
               time_column      = \"p_timestamp\"\n\
               default_interval = \"1h\"\n\
             }\n\
             \n\
             url {\n\
               field_delimiter = \",\"\n\
             }",
        ),

        //---------------------------------------------------------------------
        // Everything else: the report carries its own help
        //---------------------------------------------------------------------
        _ => None,
    }
}
