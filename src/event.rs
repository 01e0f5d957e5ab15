use crossterm::event::KeyEvent;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Sent at a regular interval; views apply settled requests on it.
    Tick,
    Key(KeyEvent),
    /// The terminal was resized; the next draw picks up the new size.
    Resize,
}
