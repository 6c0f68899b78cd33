use pomoplan_core::Theme;

use super::{CmdResult, Session};

pub fn run(theme: Option<Theme>) -> CmdResult {
    let mut session = Session::open()?;
    let theme = match theme {
        Some(theme) => {
            session.ctx.set_theme(theme);
            theme
        }
        None => session.ctx.toggle_theme(),
    };
    println!("{theme}");
    session.save();
    Ok(())
}
