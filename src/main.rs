use clap::Parser;
use placement_zones::utils::error::ErrorSeverity;
use placement_zones::utils::logger;
use placement_zones::{
    CliConfig, HttpTransport, PlacementZoneService, Result, StoreTagRegistry, ZoneCommand,
    ZoneError,
};

type Service = PlacementZoneService<HttpTransport, StoreTagRegistry<HttpTransport>>;

async fn run(config: &CliConfig, service: &Service) -> Result<String> {
    match &config.command {
        ZoneCommand::Ls => {
            let list = service.list().await?;
            service.render_list(&list).await
        }
        ZoneCommand::Inspect { id } => {
            let zone = service.get(id).await?;
            Ok(serde_json::to_string_pretty(&zone)?)
        }
        ZoneCommand::Name { link } => service.get_name(link).await,
        command @ ZoneCommand::Add { .. } => {
            let new_zone = command.new_zone().ok_or_else(|| ZoneError::ValidationError {
                message: "missing zone definition".to_string(),
            })?;
            let id = service.create(&new_zone).await?;
            Ok(format!("Placement zone added: {}", id))
        }
        ZoneCommand::Update { id, .. } => {
            let edit = config.command.zone_edit().unwrap_or_default();
            if edit.is_empty() {
                tracing::warn!("Nothing to update for '{}'", id);
            }
            let updated = service.edit(id, &edit).await?;
            Ok(format!("Placement zone updated: {}", updated))
        }
        ZoneCommand::Rm { id } => {
            let removed = service.remove(id).await?;
            Ok(format!("Placement zone removed: {}", removed))
        }
    }
}

fn exit_with(e: &ZoneError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // 遠端錯誤
        ErrorSeverity::High => 1,   // 輸入或查找錯誤
        ErrorSeverity::Critical => 3, // 資料損毀
    };
    std::process::exit(exit_code)
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config.command);

    // 驗證配置
    let settings = match config.client_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            exit_with(&e)
        }
    };
    tracing::debug!("📡 Using server {}", settings.server_url);

    let transport = match HttpTransport::new(&settings) {
        Ok(transport) => transport,
        Err(e) => exit_with(&e),
    };
    let service = PlacementZoneService::new(
        transport.clone(),
        StoreTagRegistry::new(transport),
    );

    match run(&config, &service).await {
        Ok(output) => println!("{}", output),
        Err(e) => exit_with(&e),
    }
}
