//! Interactive session.
//!
//! Each command is one widget change: it updates the session state and the
//! selected market is rendered again. Provider data is fetched at most once
//! per session unless `refresh` is issued.

use crate::render;
use anyhow::{Result, anyhow, bail};
use sift::{Market, Session, SiftConfig};
use sift_screen::{GROSS_MIN_BOUNDS, PE_MAX_BOUNDS, ROE_MIN_BOUNDS, Thresholds};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  roe N       minimum ROE %        (0-40)
  pe N        maximum P/E          (0-100)
  gross N     minimum gross margin (0-100)
  market X    switch market: a-share, hk, us
  show        render again
  refresh     drop cached data and refetch
  help        this message
  quit        leave
";

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Command {
    Roe(f64),
    Pe(f64),
    Gross(f64),
    Market(Market),
    Show,
    Refresh,
    Help,
    Quit,
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Render,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub(crate) fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        bail!("too many arguments: {}", line.trim());
    }

    let number = |name: &str| -> Result<f64> {
        let raw = arg.ok_or_else(|| anyhow!("{name} needs a value"))?;
        raw.parse::<f64>()
            .map_err(|_| anyhow!("{name}: not a number: {raw}"))
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "roe" => Command::Roe(number("roe")?),
        "pe" => Command::Pe(number("pe")?),
        "gross" | "gm" => Command::Gross(number("gross")?),
        "market" | "m" => {
            let name = arg.ok_or_else(|| anyhow!("market needs a name"))?;
            Command::Market(name.parse()?)
        }
        "show" | "s" => Command::Show,
        "refresh" | "r" => Command::Refresh,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command: {other} (try `help`)"),
    };
    Ok(Some(command))
}

/// Session state driven by commands.
#[derive(Debug)]
pub(crate) struct Interactive {
    session: Session,
    market: Market,
    thresholds: Thresholds,
}

impl Interactive {
    pub(crate) fn new(session: Session, market: Market) -> Self {
        Self {
            session,
            market,
            thresholds: Thresholds::default(),
        }
    }

    /// Apply a command. Rejected threshold values leave the state unchanged.
    pub(crate) fn apply(&mut self, command: Command) -> Result<Action> {
        match command {
            Command::Roe(v) => self.thresholds.roe_min = ROE_MIN_BOUNDS.check(v)?,
            Command::Pe(v) => self.thresholds.pe_max = PE_MAX_BOUNDS.check(v)?,
            Command::Gross(v) => self.thresholds.gross_min = GROSS_MIN_BOUNDS.check(v)?,
            Command::Market(market) => self.market = market,
            Command::Show => {}
            Command::Refresh => self.session.refresh(),
            Command::Help => return Ok(Action::Help),
            Command::Quit => return Ok(Action::Quit),
        }
        Ok(Action::Render)
    }

    /// Render the selected market, with failures shown inline.
    pub(crate) async fn render(&mut self) -> String {
        match self.session.render(self.market, &self.thresholds).await {
            Ok(view) => render::view_text(&view, self.session.period(), None),
            Err(e) => render::failure_text(self.market, &e),
        }
    }
}

/// Run the read-eval-render loop on stdin until `quit` or end of input.
pub(crate) async fn run_interactive(config: &SiftConfig, market: Market) -> Result<()> {
    let mut state = Interactive::new(Session::from_config(config), market);
    print!("{HELP}");
    println!("{}", state.render().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("sift> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let action = parse_command(&line).and_then(|c| c.map(|c| state.apply(c)).transpose());
        match action {
            Ok(None) => {}
            Ok(Some(Action::Render)) => println!("{}", state.render().await),
            Ok(Some(Action::Help)) => print!("{HELP}"),
            Ok(Some(Action::Quit)) => break,
            Err(e) => println!("error: {e}"),
        }
    }

    tracing::info!(cache = ?state.session.cache_stats(), "session finished");
    Ok(())
}
