//! Line-oriented console for driving the site logic by hand.
//!
//! Usage: cargo run [SITE_RON] [PROJECTS_KDL]
//! Defaults: "data/site.ron", "data/projects.kdl"

use std::io::{self, BufRead, Write};

use skypioneers::calculator::{CalcMode, FormFields};
use skypioneers::events::SiteEvent;
use skypioneers::loading;
use skypioneers::registry::ProjectId;
use skypioneers::site::Site;
use skypioneers::ui::RonFileStore;

const HELP: &str = "\
commands:
  wait <ms>                 advance the clock
  theme                     toggle light/dark
  scroll <px>               scroll the page
  stats <ratio>             stats section visibility (0..1)
  mode installment|affordability
  calc <id>=<value> ...     run the calculator, e.g. calc calc-price=3000000
  filter <tag>              map filter chip (all, nac, zayed, ...)
  card <index>              click a sidebar card
  plan <id>                 open a project's master plan
  exit-plan                 close the master plan
  next | prev               blog carousel
  submit                    submit the listing form
  chat <text>               send a chat message
  log [n]                   show the last n events
  quit";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or("data/site.ron");
    let projects_path = args.get(2).map(String::as_str).unwrap_or("data/projects.kdl");

    let config = loading::load_site_config(config_path);
    let registry = loading::load_projects(projects_path);
    let store = RonFileStore::open(&config.theme.store_path);

    let mut site = Site::new(config, registry, store);
    site.boot();
    println!("{HELP}");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("[{} ms] > ", site.now().0);
        if let Err(e) = stdout.flush() {
            log::warn!("stdout: {}", e);
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!("stdin: {}", e);
                break;
            }
        }
        let line = line.trim();
        if line == "quit" {
            break;
        }
        if let Err(msg) = run_command(&mut site, line) {
            println!("error: {msg}");
        }
    }
}

fn run_command<S: skypioneers::ui::ThemeStore>(
    site: &mut Site<S>,
    line: &str,
) -> Result<(), String> {
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let number = |s: &str| s.parse::<f64>().map_err(|_| format!("not a number: {s:?}"));

    match cmd {
        "" => {}
        "help" => println!("{HELP}"),
        "wait" => {
            let ms = rest
                .parse::<u64>()
                .map_err(|_| format!("not a duration: {rest:?}"))?;
            site.advance_by(ms);
        }
        "theme" => {
            let view = site.toggle_theme();
            println!("theme {} (icon {})", site.theme.mode().as_str(), view.icon_class);
        }
        "scroll" => site.scroll(number(rest)?),
        "stats" => site.stats_visible(number(rest)?),
        "mode" => {
            let mode = match rest {
                "installment" => CalcMode::Installment,
                "affordability" => CalcMode::Affordability,
                other => return Err(format!("unknown mode {other:?}")),
            };
            site.calculator.switch_mode(mode);
        }
        "calc" => {
            let fields: FormFields = rest
                .split_whitespace()
                .filter_map(|kv| kv.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let output = site.calculate(&fields).map_err(|e| e.to_string())?;
            for (id, text) in output {
                println!("  {id}: {text}");
            }
        }
        "filter" => {
            if !site.filter_map(rest) {
                return Err(format!("unknown region {rest:?}"));
            }
            println!("{} projects", site.map.project_count());
        }
        "card" => {
            let index = rest
                .parse::<usize>()
                .map_err(|_| format!("not an index: {rest:?}"))?;
            site.click_card(index).map_err(|e| e.to_string())?;
        }
        "plan" => {
            let id = rest
                .parse::<u32>()
                .map_err(|_| format!("not a project id: {rest:?}"))?;
            site.enter_master_plan(ProjectId(id))
                .map_err(|e| e.to_string())?;
        }
        "exit-plan" => site.exit_master_plan(),
        "next" => {
            site.carousel_next();
        }
        "prev" => {
            site.carousel_prev();
        }
        "submit" => {
            if !site.submit_listing() {
                return Err("a submission is already processing".into());
            }
        }
        "chat" => site.send_chat_from_bottom_bar(rest),
        "log" => {
            let n = if rest.is_empty() {
                20
            } else {
                rest.parse::<usize>()
                    .map_err(|_| format!("not a count: {rest:?}"))?
            };
            for event in site.events.recent(n) {
                print_event(event);
            }
        }
        other => return Err(format!("unknown command {other:?}, try help")),
    }
    Ok(())
}

fn print_event(event: &SiteEvent) {
    match event {
        SiteEvent::ChatMessage { sender, text, at } => {
            println!("{:>8} ms  {:?}: {}", at.0, sender, text)
        }
        SiteEvent::ToastShown { kind, message, at } => {
            println!("{:>8} ms  toast {:?}: {}", at.0, kind, message)
        }
        other => println!("{:>8} ms  {:?}", other.at().0, other),
    }
}
