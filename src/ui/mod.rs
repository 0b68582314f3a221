pub mod dialog;
pub mod keybar;
pub mod layout;
pub mod markup;
pub mod question;
pub mod result;
pub mod statusbar;
pub mod titlebar;

use ratatui::Frame;

use crate::session::RunView;
use crate::state::AppState;
use crate::store::RunStore;

pub fn draw<S: RunStore + ?Sized>(f: &mut Frame, state: &AppState, store: &S) {
    let area = f.area();
    let layout = layout::compute_layout(area);

    titlebar::draw_titlebar(f, layout.titlebar, state);
    match state.session.view(store) {
        RunView::Active(_) => question::draw_question(f, layout.main, state, store),
        RunView::Completed { total, correct } => {
            result::draw_completed(f, layout.main, state, store, total, correct)
        }
        RunView::OutOfRange => {}
    }
    statusbar::draw_statusbar(f, layout.statusbar, state, store);
    keybar::draw_keybar(f, layout.keybar, state);

    if state.has_dialog() {
        dialog::draw_dialog(f, area, state, store);
    }
}
