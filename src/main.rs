use anyhow::Result;
use clap::Parser;
use interview_copilot::{audio, Config, CopilotApp};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "interview-copilot")]
#[command(about = "Record speaker audio, transcribe it, and get a suggested answer")]
struct Args {
    /// Path to a TOML config file (optional; defaults apply without one)
    #[arg(long)]
    config: Option<String>,

    /// Override the input-device name hint (default: "monitor")
    #[arg(long)]
    device: Option<String>,

    /// Print available input devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.list_devices {
        for name in audio::list_input_devices(&cpal::default_host())? {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(hint) = args.device {
        config.audio.device_hint = hint;
    }

    info!("Interview Copilot v0.1.0");
    info!("Output WAV: {}", config.audio.output_path);
    info!("LLM endpoint: {} ({})", config.llm.url, config.llm.model);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([
            config.ui.window_width,
            config.ui.window_height,
        ]),
        ..Default::default()
    };

    eframe::run_native(
        "Interview Copilot",
        options,
        Box::new(move |_cc| Ok(Box::new(CopilotApp::new(config, handle)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;

    Ok(())
}
