use crossterm::event::{self, Event};
use ratatui::Frame;

/// Trait for TUI applications.
///
/// Applications executed by [`run`] must implement this trait.
pub trait App {
    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, event: &Event);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);
}

/// Runs the application until `app.should_exit()` returns true.
///
/// The screen is redrawn after every terminal event; nothing changes between
/// events, so no tick or frame timer is needed.
pub fn run<A>(app: &mut A) -> anyhow::Result<()>
where
    A: App,
{
    ratatui::run(|terminal| {
        while !app.should_exit() {
            terminal.draw(|f| app.draw(f))?;
            let event = event::read()?;
            app.handle_event(&event);
        }
        Ok::<(), std::io::Error>(())
    })?;
    Ok(())
}
