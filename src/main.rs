use clap::Parser;
use contact_directory::adapters::load_from_config;
use contact_directory::app::{self, SearchRequest};
use contact_directory::config::Command;
use contact_directory::core::selection::SelectionController;
use contact_directory::domain::model::SelectionField;
use contact_directory::presentation;
use contact_directory::utils::error::{DirectoryError, ErrorSeverity};
use contact_directory::utils::{logger, validation::Validate};
use contact_directory::CliConfig;
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting contact-directory");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("{}", presentation::error_banner(&e.user_friendly_message()));
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<(), DirectoryError> {
    let settings = config.settings()?;

    match &config.command {
        Command::Options(args) => {
            settings.validate_local()?;
            let field =
                SelectionField::parse(&args.field).ok_or_else(|| DirectoryError::ConfigError {
                    message: format!("unknown field '{}'", args.field),
                })?;

            let mut controller = SelectionController::new(load_from_config(&settings)?);
            if let Some(mc) = &args.mc {
                controller.select_mc(Some(mc.as_str()));
            } else if let Some(region) = &args.region {
                controller.select_region(Some(region.as_str()));
            }
            println!(
                "{}",
                presentation::render_options(field, &controller.options_for(field))
            );
        }
        Command::Search(args) => {
            settings.validate()?;
            let mut session = app::build_session(&settings)?;
            let request = SearchRequest {
                query: args.query.clone(),
                region: args.region.clone(),
                mc: args.mc.clone(),
                lc: args.lc.clone(),
                func: args.func.clone(),
                term: args.term.clone(),
            };

            eprintln!("{}", presentation::LOADING_INDICATOR);
            let output = app::run_search(&mut session, &request, args.format).await?;
            println!("{}", output.rendered);
            tracing::info!("🔗 Share this search: {}", output.share_link);
        }
        Command::Shell => {
            settings.validate()?;
            let mut session = app::build_session(&settings)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            app::run_shell(&mut session, stdin, &mut stdout).await?;
            stdout.flush()?;
        }
    }

    Ok(())
}
