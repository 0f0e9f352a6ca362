use anyhow::Context;
use clap::Parser;
use h1_extractor::config::LogFormat;
use h1_extractor::core::ConfigProvider;
use h1_extractor::utils::error::{ErrorSeverity, EtlError};
use h1_extractor::utils::{logger, validation::Validate};
use h1_extractor::{CliConfig, EtlEngine, H1Pipeline, LocalStorage, ProcessingResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting h1-extractor");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            let (result, code) = failure(&e);
            print_result(&result)?;
            std::process::exit(code);
        }
    };

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 上傳檔用絕對或相對路徑讀取，結果寫進 output_path
    let storage = LocalStorage::new(config.output_path().to_string());
    let input = std::path::absolute(&cli.input)
        .with_context(|| format!("cannot resolve input path '{}'", cli.input))?;

    let outcome = match H1Pipeline::new(storage, config, input.to_string_lossy()) {
        Ok(pipeline) => {
            EtlEngine::new_with_monitoring(pipeline, monitor_enabled)
                .run()
                .await
        }
        Err(e) => Err(e),
    };

    let (result, code) = match outcome {
        Ok(reference) => {
            tracing::info!("✅ Extraction completed successfully!");
            (ProcessingResult::completed(reference), 0)
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            failure(&e)
        }
    };

    print_result(&result)?;

    if code > 0 {
        std::process::exit(code);
    }

    Ok(())
}

fn failure(error: &EtlError) -> (ProcessingResult, i32) {
    (
        ProcessingResult::error(error.user_friendly_message()),
        exit_code(error.severity()),
    )
}

/// 結果 JSON 一律寫到 stdout，日誌走 stderr
fn print_result(result: &ProcessingResult) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(result).context("failed to serialize result")?
    );
    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
