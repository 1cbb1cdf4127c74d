use clap::{Parser, Subcommand};
use pd_app::{
    AppConfig, AppResult, DetectionGateway, Notice, NoticeLevel, ReportService, VideoUpload,
    cost_table, fetch_summary, proportion_chart, source_for, start_live_detection,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pd-cli")]
#[command(about = "Pothole desk - reports, dashboard and detection dispatch", long_about = None)]
struct Cli {
    /// Path to a YAML config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dashboard counts, the proportion chart and per-report costs
    Summary,
    /// List, show or export reports
    #[command(subcommand)]
    Reports(ReportCommands),
    /// Submit a video to the detection engine and save the processed video
    Detect {
        /// Video file to process
        video: Option<PathBuf>,
        /// Directory the processed video is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Start live detection in the background
    Live,
}

#[derive(Subcommand)]
enum ReportCommands {
    /// List available reports
    List,
    /// Show a report as a table with repair costs
    Show {
        /// Report file name, as printed by `reports list`
        name: String,
    },
    /// Export a report to `{name}_report.pdf`
    Pdf {
        /// Report file name, as printed by `reports list`
        name: String,
        /// Directory the PDF is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct JsonErr<'a> {
    ok: bool,
    error: &'a Notice,
}

fn main() -> ExitCode {
    // Initialize tracing; logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.is_processing_error() {
                tracing::error!(error = ?err, "video processing failed");
            } else {
                tracing::debug!(error = ?err, "command failed");
            }
            let notice = Notice::from(&err);
            if cli.json {
                let body = JsonErr {
                    ok: false,
                    error: &notice,
                };
                println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
            } else {
                print_notice(&notice);
            }
            // Bad input from the caller, as opposed to a failure on our side.
            if err.is_upload_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Summary => cmd_summary(&config, cli.json),
        Commands::Reports(report_cmd) => match report_cmd {
            ReportCommands::List => cmd_reports_list(&config, cli.json),
            ReportCommands::Show { name } => cmd_reports_show(&config, name, cli.json),
            ReportCommands::Pdf { name, output } => {
                cmd_reports_pdf(&config, name, output, cli.json)
            }
        },
        Commands::Detect { video, output } => {
            cmd_detect(&config, video.as_deref(), output, cli.json)
        }
        Commands::Live => cmd_live(&config, cli.json),
    }
}

fn print_json<T: Serialize>(data: T) -> AppResult<()> {
    let out =
        serde_json::to_string_pretty(&JsonOut { ok: true, data }).map_err(std::io::Error::from)?;
    println!("{}", out);
    Ok(())
}

fn print_notice(notice: &Notice) {
    let mark = match notice.level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "✗",
    };
    eprintln!("{} {}", mark, notice.message);
}

fn cmd_summary(config: &AppConfig, json: bool) -> AppResult<()> {
    let source = source_for(config);
    let summary = fetch_summary(&*source, &config.dashboard.defaults);
    let chart = proportion_chart(&summary);
    let costs = cost_table(&summary, &config.costs.rates());

    if json {
        #[derive(Serialize)]
        struct SummaryOut<'a> {
            summary: &'a pd_app::DashboardSummary,
            chart: &'a pd_app::ProportionChart,
            costs: &'a [pd_app::CostRow],
        }
        return print_json(SummaryOut {
            summary: &summary,
            chart: &chart,
            costs: &costs,
        });
    }

    if summary.from_fallback {
        print_notice(&Notice::warning("Failed to fetch dashboard data!"));
    }

    println!("Total Potholes Detected: {}", summary.total_potholes_detected);
    println!("Total Reports Generated: {}", summary.total_reports_generated);
    println!("Repairs Completed:       {}", summary.total_repairs_completed);

    println!();
    println!("Pothole Data Overview:");
    for slice in &chart.slices {
        println!(
            "  {:<18} {:>6}  {:>5.1}%  {}",
            slice.label,
            slice.value,
            slice.share * 100.0,
            slice.color
        );
    }

    println!();
    if costs.is_empty() {
        println!("No volume data available");
    } else {
        let currency = &config.costs.currency;
        println!("Total Volume and Costs ({}):", currency);
        for row in &costs {
            println!(
                "  {} - {} m3, cement {}, concrete {}, total {}",
                row.file_name, row.total_volume, row.cement_cost, row.concrete_cost, row.total_cost
            );
        }
    }
    Ok(())
}

fn cmd_reports_list(config: &AppConfig, json: bool) -> AppResult<()> {
    let reports = ReportService::new(config).list_reports()?;

    if json {
        return print_json(&reports);
    }

    if reports.is_empty() {
        println!("No reports found in {}", config.reports_dir.display());
    } else {
        for name in reports {
            println!("{}", name);
        }
    }
    Ok(())
}

fn cmd_reports_show(config: &AppConfig, name: &str, json: bool) -> AppResult<()> {
    let service = ReportService::new(config);

    if json {
        return print_json(service.load_report(name)?);
    }

    let table = service.report_table(name)?;
    print!("{}", table.to_text());
    if table.is_empty() {
        print_notice(&Notice::warning("No data available for this report."));
    } else {
        print_notice(&Notice::success("Report data loaded."));
    }
    Ok(())
}

fn cmd_reports_pdf(config: &AppConfig, name: &str, output: &Path, json: bool) -> AppResult<()> {
    let path = ReportService::new(config).export_pdf(name, output)?;

    if json {
        return print_json(path.display().to_string());
    }

    println!("{}", path.display());
    print_notice(&Notice::success("PDF generated successfully!"));
    Ok(())
}

fn cmd_detect(
    config: &AppConfig,
    video: Option<&Path>,
    output: &Path,
    json: bool,
) -> AppResult<()> {
    let upload = video.map(VideoUpload::from_path).transpose()?;
    let processed = DetectionGateway::new(config).submit_video(upload)?;
    let path = processed.save_to(output)?;

    if json {
        #[derive(Serialize)]
        struct DetectOut {
            request_id: String,
            path: String,
            content_type: &'static str,
            content_disposition: String,
            bytes: usize,
        }
        return print_json(DetectOut {
            request_id: processed.request_id.to_string(),
            path: path.display().to_string(),
            content_type: processed.content_type,
            content_disposition: processed.content_disposition.clone(),
            bytes: processed.bytes.len(),
        });
    }

    println!("{}", path.display());
    print_notice(&Notice::success("Video processed successfully!"));
    Ok(())
}

fn cmd_live(config: &AppConfig, json: bool) -> AppResult<()> {
    let ack = start_live_detection(&config.live)?;

    if json {
        return print_json(&ack);
    }

    println!("pid {}", ack.pid);
    print_notice(&Notice::success(ack.message));
    Ok(())
}
