//! Interactive admin console: the view layer over the session store, the
//! route guard and the page controllers. Every navigation goes through the
//! guard, so the console itself contains no permission logic.

pub mod tableview;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::AppError;
use crate::gateway::ApiGateway;
use crate::guard::{NavDecision, RouteGuard};
use crate::pages::{self, ListQuery};
use crate::routes::{self, LOGIN_ROUTE};
use crate::session::SessionStore;
use tableview::{print_page_summary, print_table};

const HELP: &str = "\
Commands:\n  pages                      list the pages your permissions allow\n  open <page>                navigate (by key or path, e.g. 'orders' or '/orders')\n  next | prev | page <n>     paginate the current list\n  search <text>              free-text search on the current list\n  filter <key> <value>       add a filter (e.g. 'filter status pending')\n  clear                      drop search and filters\n  show <id>                  fetch one record and display it\n  refresh                    refetch the current page\n  whoami | status            session and connection info\n  verify <id> <true|false>   farmers/restaurants/boutiques: verification\n  avail <id> <open|closed>   restaurants: availability\n  activate <id> <true|false> riders: activation\n  block <id> <true|false>    customers: block/unblock\n  setstatus <id> <status>    orders: dispatch a status change\n  settle <id>                payments: mark settled\n  perms <id> <k1,k2|->       users: replace permission sequence ('-' = all)\n  days <n>                   analytics: window size\n  logout                     clear the session\n  help                       this text\n  quit | exit                leave the console";

pub struct Console {
    cfg: Config,
    session: Arc<SessionStore>,
    gateway: Arc<ApiGateway>,
    guard: RouteGuard,
    route: String,
    query: ListQuery,
    analytics_days: u32,
}

impl Console {
    pub fn new(cfg: Config, session: Arc<SessionStore>, gateway: Arc<ApiGateway>) -> Self {
        let query = ListQuery::new(cfg.page_size);
        let guard = RouteGuard::new(session.clone());
        Self { cfg, session, gateway, guard, route: routes::ROOT_ROUTE.to_string(), query, analytics_days: 30 }
    }

    /// Start on a specific route (from `--page`); the guard still decides
    /// whether the user actually lands there.
    pub fn with_start_route(mut self, route: &str) -> Self {
        self.route = route.to_string();
        self
    }

    /// Main loop: every iteration re-evaluates the guard, so login, logout
    /// and 401 invalidations all converge on the right view without any page
    /// knowing about them.
    pub fn run(&mut self, rt: &Runtime) -> Result<()> {
        loop {
            match self.guard.decide(&self.route) {
                NavDecision::Loading => {
                    rt.block_on(self.session.restore());
                }
                NavDecision::RedirectToLogin => {
                    self.route = LOGIN_ROUTE.to_string();
                }
                NavDecision::RenderLogin => {
                    if !self.login_view(rt)? {
                        return Ok(());
                    }
                }
                NavDecision::Redirect { to } => {
                    self.navigate(&to);
                }
                NavDecision::Render { path, .. } => {
                    self.render_page(rt, path);
                    // A 401 during the fetch dropped the session; hand
                    // control back to the guard instead of prompting on a
                    // page the user can no longer access.
                    if self.session.identity().is_none() {
                        continue;
                    }
                    if !self.command_loop(rt, path)? {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn navigate(&mut self, to: &str) {
        if self.route != to {
            self.route = to.to_string();
            // List state is per-page; a navigation resets it.
            self.query = ListQuery::new(self.cfg.page_size);
        }
    }

    // ---- login view -----------------------------------------------------

    /// Returns false when the user quits from the login prompt.
    fn login_view(&mut self, rt: &Runtime) -> Result<bool> {
        println!("\nSign in to Agora ({})", self.cfg.api_url);
        let Some(email) = read_line("email: ")? else { return Ok(false) };
        if email.eq_ignore_ascii_case("quit") || email.eq_ignore_ascii_case("exit") {
            return Ok(false);
        }
        if email.is_empty() {
            return Ok(true);
        }
        let Some(password) = read_line("password: ")? else { return Ok(false) };

        match rt.block_on(self.session.login(&email, &password)) {
            Ok(identity) => {
                println!("welcome, {} ({})", identity.name, identity.role);
                let landing = self.session.default_landing_page().to_string();
                self.navigate(&landing);
            }
            Err(e) => {
                // Server message verbatim, with a generic fallback.
                eprintln!("login failed: {}", present_error(&e));
            }
        }
        Ok(true)
    }

    // ---- page rendering -------------------------------------------------

    fn render_page(&mut self, rt: &Runtime, path: &str) {
        println!();
        let res = match path {
            "/" => self.render_dashboard(rt),
            "/farmers" => self.render_list(rt, path),
            "/restaurants" => self.render_list(rt, path),
            "/boutiques" => self.render_list(rt, path),
            "/riders" => self.render_list(rt, path),
            "/customers" => self.render_list(rt, path),
            "/orders" => self.render_list(rt, path),
            "/payments" => self.render_list(rt, path),
            "/analytics" => self.render_analytics(rt),
            "/users" => self.render_list(rt, path),
            other => {
                eprintln!("no renderer for {}", other);
                Ok(())
            }
        };
        if let Err(e) = res {
            // Auth errors need no message here: the session was invalidated
            // and the next guard pass lands on the login view.
            if !e.is_auth() {
                eprintln!("error: {}", present_error(&e));
            }
        }
    }

    fn render_dashboard(&self, rt: &Runtime) -> std::result::Result<(), AppError> {
        let s = rt.block_on(pages::dashboard::summary(&self.gateway))?;
        println!("dashboard");
        print_table(pages::dashboard::columns(), &pages::dashboard::rows(&s));
        Ok(())
    }

    fn render_analytics(&self, rt: &Runtime) -> std::result::Result<(), AppError> {
        let points = rt.block_on(pages::analytics::revenue(&self.gateway, self.analytics_days))?;
        println!("analytics: revenue, last {} days", self.analytics_days);
        let rows: Vec<Vec<String>> = points.iter().map(pages::analytics::row).collect();
        print_table(pages::analytics::columns(), &rows);
        Ok(())
    }

    fn render_list(&self, rt: &Runtime, path: &str) -> std::result::Result<(), AppError> {
        println!("{}{}", &path[1..], describe_query(&self.query));
        match path {
            "/farmers" => {
                let p = rt.block_on(pages::farmers::list(&self.gateway, &self.query))?;
                let rows: Vec<Vec<String>> = p.items.iter().map(pages::farmers::row).collect();
                print_table(pages::farmers::columns(), &rows);
                print_page_summary(p.items.len(), p.total, p.page, p.page_count());
            }
            "/restaurants" => {
                let p = rt.block_on(pages::restaurants::list(&self.gateway, &self.query))?;
                let rows: Vec<Vec<String>> = p.items.iter().map(pages::restaurants::row).collect();
                print_table(pages::restaurants::columns(), &rows);
                print_page_summary(p.items.len(), p.total, p.page, p.page_count());
            }
            "/boutiques" => {
                let p = rt.block_on(pages::boutiques::list(&self.gateway, &self.query))?;
                let rows: Vec<Vec<String>> = p.items.iter().map(pages::boutiques::row).collect();
                print_table(pages::boutiques::columns(), &rows);
                print_page_summary(p.items.len(), p.total, p.page, p.page_count());
            }
            "/riders" => {
                let p = rt.block_on(pages::riders::list(&self.gateway, &self.query))?;
                let rows: Vec<Vec<String>> = p.items.iter().map(pages::riders::row).collect();
                print_table(pages::riders::columns(), &rows);
                print_page_summary(p.items.len(), p.total, p.page, p.page_count());
            }
            "/customers" => {
                let p = rt.block_on(pages::customers::list(&self.gateway, &self.query))?;
                let rows: Vec<Vec<String>> = p.items.iter().map(pages::customers::row).collect();
                print_table(pages::customers::columns(), &rows);
                print_page_summary(p.items.len(), p.total, p.page, p.page_count());
            }
            "/orders" => {
                let p = rt.block_on(pages::orders::list(&self.gateway, &self.query))?;
                let rows: Vec<Vec<String>> = p.items.iter().map(pages::orders::row).collect();
                print_table(pages::orders::columns(), &rows);
                print_page_summary(p.items.len(), p.total, p.page, p.page_count());
            }
            "/payments" => {
                let p = rt.block_on(pages::payments::list(&self.gateway, &self.query))?;
                let rows: Vec<Vec<String>> = p.items.iter().map(pages::payments::row).collect();
                print_table(pages::payments::columns(), &rows);
                print_page_summary(p.items.len(), p.total, p.page, p.page_count());
            }
            "/users" => {
                let p = rt.block_on(pages::users::list(&self.gateway, &self.query))?;
                let rows: Vec<Vec<String>> = p.items.iter().map(pages::users::row).collect();
                print_table(pages::users::columns(), &rows);
                print_page_summary(p.items.len(), p.total, p.page, p.page_count());
            }
            _ => {}
        }
        Ok(())
    }

    // ---- command handling -----------------------------------------------

    /// Read commands until one needs a re-render (navigation, pagination,
    /// mutation) or the user leaves. Returns false to quit the console.
    fn command_loop(&mut self, rt: &Runtime, path: &str) -> Result<bool> {
        loop {
            let Some(line) = read_line(&format!("agora {}> ", self.route))? else { return Ok(false) };
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let cmd = parts.next().unwrap_or("").to_lowercase();
            let rest: Vec<&str> = parts.collect();

            match cmd.as_str() {
                "quit" | "exit" => return Ok(false),
                "help" => println!("{}", HELP),
                "logout" => {
                    self.session.logout();
                    println!("logged out");
                    return Ok(true);
                }
                "whoami" => match self.session.identity() {
                    Some(id) => {
                        let perms = if id.permissions.is_empty() { "(all)".to_string() } else { id.permissions.join(",") };
                        println!("{} <{}> role={} permissions={}", id.name, id.email, id.role, perms);
                    }
                    None => println!("not signed in"),
                },
                "status" => {
                    println!("connected to {}", self.cfg.api_url);
                    println!("route: {}", self.route);
                    println!("page size: {}", self.cfg.page_size);
                }
                "pages" => match self.session.identity() {
                    Some(id) => {
                        for (key, p) in routes::nav_entries(&id) {
                            println!("  {:<12} {}", key, p);
                        }
                    }
                    None => println!("not signed in"),
                },
                "open" => {
                    let Some(target) = rest.first() else { eprintln!("usage: open <page>"); continue };
                    let to = routes::path_for(target).map(|p| p.to_string()).unwrap_or_else(|| {
                        if target.starts_with('/') { target.to_string() } else { format!("/{}", target) }
                    });
                    self.navigate(&to);
                    return Ok(true);
                }
                "next" => {
                    self.query.page += 1;
                    return Ok(true);
                }
                "prev" => {
                    self.query.page = self.query.page.saturating_sub(1).max(1);
                    return Ok(true);
                }
                "page" => {
                    let Some(n) = rest.first().and_then(|v| v.parse::<u32>().ok()).filter(|n| *n > 0) else {
                        eprintln!("usage: page <n>");
                        continue;
                    };
                    self.query.page = n;
                    return Ok(true);
                }
                "search" => {
                    self.query = self.query.clone().with_search(&rest.join(" "));
                    return Ok(true);
                }
                "filter" => {
                    let (Some(k), Some(v)) = (rest.first(), rest.get(1)) else {
                        eprintln!("usage: filter <key> <value>");
                        continue;
                    };
                    self.query = self.query.clone().with_filter(k, v);
                    return Ok(true);
                }
                "clear" => {
                    self.query = ListQuery::new(self.cfg.page_size);
                    return Ok(true);
                }
                "refresh" => return Ok(true),
                "show" => {
                    let Some(id) = rest.first() else { eprintln!("usage: show <id>"); continue };
                    self.show_detail(rt, path, id);
                }
                "days" if path == "/analytics" => {
                    let Some(n) = rest.first().and_then(|v| v.parse::<u32>().ok()).filter(|n| *n > 0) else {
                        eprintln!("usage: days <n>");
                        continue;
                    };
                    self.analytics_days = n;
                    return Ok(true);
                }
                _ => {
                    match self.page_action(rt, path, &cmd, &rest) {
                        Some(Ok(())) => {
                            println!("ok");
                            return Ok(true); // refetch after a mutation
                        }
                        Some(Err(e)) => {
                            if e.is_auth() {
                                return Ok(true);
                            }
                            eprintln!("error: {}", present_error(&e));
                        }
                        None => eprintln!("unknown command '{}'; try 'help'", cmd),
                    }
                }
            }
        }
    }

    /// Fetch one record through the page's typed detail endpoint (the
    /// `/admin/*` paths) and render it as a single-row table.
    fn show_detail(&self, rt: &Runtime, path: &str, id: &str) {
        let gw = &self.gateway;
        let res = match path {
            "/farmers" => rt
                .block_on(pages::farmers::detail(gw, id))
                .map(|r| print_table(pages::farmers::columns(), &[pages::farmers::row(&r)])),
            "/restaurants" => rt
                .block_on(pages::restaurants::detail(gw, id))
                .map(|r| print_table(pages::restaurants::columns(), &[pages::restaurants::row(&r)])),
            "/boutiques" => rt
                .block_on(pages::boutiques::detail(gw, id))
                .map(|r| print_table(pages::boutiques::columns(), &[pages::boutiques::row(&r)])),
            "/riders" => rt
                .block_on(pages::riders::detail(gw, id))
                .map(|r| print_table(pages::riders::columns(), &[pages::riders::row(&r)])),
            "/customers" => rt
                .block_on(pages::customers::detail(gw, id))
                .map(|r| print_table(pages::customers::columns(), &[pages::customers::row(&r)])),
            "/orders" => rt
                .block_on(pages::orders::detail(gw, id))
                .map(|r| print_table(pages::orders::columns(), &[pages::orders::row(&r)])),
            "/payments" => rt
                .block_on(pages::payments::detail(gw, id))
                .map(|r| print_table(pages::payments::columns(), &[pages::payments::row(&r)])),
            "/users" => rt
                .block_on(pages::users::detail(gw, id))
                .map(|r| print_table(pages::users::columns(), &[pages::users::row(&r)])),
            _ => {
                eprintln!("no record view on {}", path);
                return;
            }
        };
        if let Err(e) = res {
            if !e.is_auth() {
                eprintln!("error: {}", present_error(&e));
            }
        }
    }

    /// Page-specific mutation dispatch. Returns None when the command does
    /// not apply to the current page.
    fn page_action(
        &self,
        rt: &Runtime,
        path: &str,
        cmd: &str,
        rest: &[&str],
    ) -> Option<std::result::Result<(), AppError>> {
        let gw = &self.gateway;
        match (path, cmd) {
            ("/farmers", "verify") => {
                let (id, flag) = parse_id_bool(rest)?;
                Some(rt.block_on(pages::farmers::set_verified(gw, &id, flag)))
            }
            ("/restaurants", "verify") => {
                let (id, flag) = parse_id_bool(rest)?;
                Some(rt.block_on(pages::restaurants::set_verified(gw, &id, flag)))
            }
            ("/restaurants", "avail") => {
                let id = rest.first()?.to_string();
                let open = match rest.get(1).copied() {
                    Some("open") => true,
                    Some("closed") => false,
                    _ => return None,
                };
                Some(rt.block_on(pages::restaurants::set_open(gw, &id, open)))
            }
            ("/boutiques", "verify") => {
                let (id, flag) = parse_id_bool(rest)?;
                Some(rt.block_on(pages::boutiques::set_verified(gw, &id, flag)))
            }
            ("/riders", "activate") => {
                let (id, flag) = parse_id_bool(rest)?;
                Some(rt.block_on(pages::riders::set_active(gw, &id, flag)))
            }
            ("/customers", "block") => {
                let (id, flag) = parse_id_bool(rest)?;
                Some(rt.block_on(pages::customers::set_blocked(gw, &id, flag)))
            }
            ("/orders", "setstatus") => {
                let id = rest.first()?.to_string();
                let status = rest.get(1)?.to_string();
                Some(rt.block_on(pages::orders::update_status(gw, &id, &status)))
            }
            ("/payments", "settle") => {
                let id = rest.first()?.to_string();
                Some(rt.block_on(pages::payments::mark_settled(gw, &id)))
            }
            ("/users", "perms") => {
                let id = rest.first()?.to_string();
                let spec = rest.get(1)?.to_string();
                let perms: Vec<String> = if spec == "-" {
                    Vec::new()
                } else {
                    spec.split(',').filter(|s| !s.is_empty()).map(|s| s.to_string()).collect()
                };
                Some(rt.block_on(pages::users::set_permissions(gw, &id, &perms)))
            }
            _ => None,
        }
    }
}

fn parse_id_bool(rest: &[&str]) -> Option<(String, bool)> {
    let id = rest.first()?.to_string();
    let flag = match rest.get(1).copied() {
        Some("true") => true,
        Some("false") => false,
        _ => return None,
    };
    Some((id, flag))
}

fn describe_query(q: &ListQuery) -> String {
    let mut out = String::new();
    if let Some(s) = &q.search {
        out.push_str(&format!("  search='{}'", s));
    }
    for (k, v) in &q.filters {
        out.push_str(&format!("  {}={}", k, v));
    }
    out
}

/// Prefer a structured server message (`error` or `message` field) when the
/// payload is JSON; otherwise show the raw body, or a generic line when the
/// server sent nothing usable.
fn present_error(e: &AppError) -> String {
    let msg = e.message();
    if let Ok(val) = serde_json::from_str::<serde_json::Value>(msg) {
        for key in ["error", "message"] {
            if let Some(text) = val.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    if msg.trim().is_empty() {
        return format!("request failed (HTTP {})", e.http_status());
    }
    msg.to_string()
}

fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(buf.trim().to_string()))
}
