pub mod handlers;

pub use handlers::{
    RunArgs, build_probe_config, build_prober, build_run_options, handle_run, resolve_dir,
    save_report,
};
