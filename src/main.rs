//!
//! agora admin console binary
//! --------------------------
//! Interactive terminal console for the Agora marketplace admin API. Restores
//! a persisted session on startup, then drives the route guard loop: login
//! view when anonymous, permission-filtered pages when authenticated.

use std::env;
use std::sync::Arc;

use anyhow::Result;

use agora::config::Config;
use agora::console::Console;
use agora::gateway::ApiGateway;
use agora::session::{AuthApi, FileTokenStore, SessionStore, TokenStore};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--connect <url>] [--email <e> --password <p>] [--token-file <path>] [--page <route>] [--page-size <n>]\n\nFlags:\n  --connect <url>       API base URL (default: $AGORA_API_URL or http://127.0.0.1:8080)\n  --email <e>           Sign in non-interactively (requires --password)\n  --password <p>        Password for --email\n  --token-file <path>   Session token file (default: $AGORA_TOKEN_FILE or ~/.agora/session.json)\n  --page <route>        Start on this route, e.g. /orders (the guard still applies)\n  --page-size <n>       List page size (default: $AGORA_PAGE_SIZE or 20)\n  -h, --help            Show this help\n\nEnvironment:\n  AGORA_API_URL, AGORA_TOKEN_FILE, AGORA_PAGE_SIZE, RUST_LOG\n\nExamples:\n  {program} --connect http://127.0.0.1:8080\n  {program} --email admin@agora.test --password secret --page /orders"
    );
}

fn main() -> Result<()> {
    println!(r"    ___    ____ _____  _________ _
   /   |  / __ `/ __ \/ ___/ __ `/
  / /| | / /_/ / /_/ / /  / /_/ /
 /_/ |_|_\__, /\____/_/   \__,_/
        /____/    admin console");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut connect_url: Option<String> = None;
    let mut email: Option<String> = None;
    let mut password: Option<String> = None;
    let mut token_file: Option<String> = None;
    let mut start_page: Option<String> = None;
    let mut page_size: Option<u32> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--connect" => {
                if i + 1 >= args.len() { eprintln!("--connect requires a URL"); print_usage(&program); std::process::exit(2); }
                connect_url = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--email" => {
                if i + 1 >= args.len() { eprintln!("--email requires a value"); print_usage(&program); std::process::exit(2); }
                email = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--password" => {
                if i + 1 >= args.len() { eprintln!("--password requires a value"); print_usage(&program); std::process::exit(2); }
                password = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--token-file" => {
                if i + 1 >= args.len() { eprintln!("--token-file requires a path"); print_usage(&program); std::process::exit(2); }
                token_file = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--page" => {
                if i + 1 >= args.len() { eprintln!("--page requires a route"); print_usage(&program); std::process::exit(2); }
                start_page = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--page-size" => {
                if i + 1 >= args.len() { eprintln!("--page-size requires a number"); print_usage(&program); std::process::exit(2); }
                match args[i + 1].parse::<u32>() {
                    Ok(n) if n > 0 => page_size = Some(n),
                    _ => { eprintln!("--page-size must be a positive number"); std::process::exit(2); }
                }
                i += 2; continue;
            }
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            unk => {
                eprintln!("Unrecognized argument: {}", unk);
                print_usage(&program);
                std::process::exit(2);
            }
        }
    }

    let mut cfg = Config::from_env();
    if let Some(url) = connect_url { cfg.api_url = url; }
    if let Some(path) = token_file { cfg.token_file = path.into(); }
    if let Some(n) = page_size { cfg.page_size = n; }

    tracing::info!("agora console starting: api={} token_file={}", cfg.api_url, cfg.token_file.display());

    // Tokio runtime
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(cfg.token_file.clone()));
    let gateway = ApiGateway::new(&cfg.api_url, tokens.clone())?;
    let auth: Arc<dyn AuthApi> = gateway.clone();
    let session = SessionStore::new(tokens, auth);

    // A 401 from any admin endpoint drops the session; the guard loop then
    // lands back on the login view.
    {
        let s = session.clone();
        gateway.set_unauthorized_hook(move || s.invalidate());
    }

    rt.block_on(session.restore());

    if let (Some(email), Some(password)) = (email.as_deref(), password.as_deref()) {
        match rt.block_on(session.login(email, password)) {
            Ok(identity) => println!("signed in as {} ({})", identity.email, identity.role),
            Err(e) => {
                eprintln!("login failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    let mut console = Console::new(cfg, session, gateway);
    if let Some(page) = start_page {
        console = console.with_start_route(&page);
    }
    console.run(&rt)
}
