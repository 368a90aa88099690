use super::*;
use crate::app::{Message, Model, update};
use crate::document::Document;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

const WIDTH: u16 = 80;
const HEIGHT: u16 = 24;

fn create_test_model(text: &str) -> Model {
    Model::new(Document::from_text(text), (WIDTH, HEIGHT))
}

fn draw(model: &mut Model) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal.backend().buffer().clone()
}

fn row_text(buffer: &Buffer, y: u16, from: u16, to: u16) -> String {
    (from..to).map(|x| buffer[(x, y)].symbol()).collect()
}

fn screen_text(buffer: &Buffer) -> String {
    (0..HEIGHT)
        .map(|y| row_text(buffer, y, 0, WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview_rows(buffer: &Buffer, model: &Model) -> Vec<String> {
    let area = model.layout().preview;
    (area.y + 1..area.y + area.height - 1)
        .map(|y| row_text(buffer, y, area.x + 1, area.x + area.width - 1))
        .collect()
}

#[test]
fn test_menu_bar_lists_menus() {
    let mut model = create_test_model("");
    let buffer = draw(&mut model);
    let bar = row_text(&buffer, 0, 0, WIDTH);
    assert!(bar.starts_with("  File   Help "), "menu bar was {bar:?}");
}

#[test]
fn test_preview_pane_has_title() {
    let mut model = create_test_model("");
    let buffer = draw(&mut model);
    let top = row_text(&buffer, 1, WIDTH / 2, WIDTH);
    assert!(top.contains(" Preview "), "preview border was {top:?}");
}

#[test]
fn test_editor_shows_line_numbers_and_text() {
    let mut model = create_test_model("# Hello\n\nworld");
    let buffer = draw(&mut model);
    assert_eq!(row_text(&buffer, 1, 0, 9), "1 # Hello");
    assert_eq!(row_text(&buffer, 3, 0, 7), "3 world");
}

#[test]
fn test_preview_renders_heading_and_paragraph() {
    let mut model = create_test_model("# Hello\n\nworld");
    let buffer = draw(&mut model);
    let rows = preview_rows(&buffer, &model);
    assert_eq!(rows[0].trim_end(), "Hello");
    assert!(rows[1].starts_with("═════"));
    assert_eq!(rows[3].trim_end(), "world");
}

#[test]
fn test_preview_follows_edits() {
    let model = create_test_model("");
    let mut model = update(model, Message::InsertText("- one\n- two".to_string()));
    let buffer = draw(&mut model);
    let rows = preview_rows(&buffer, &model);
    assert_eq!(rows[0].trim_end(), "• one");
    assert_eq!(rows[1].trim_end(), "• two");
}

#[test]
fn test_preview_renders_table() {
    let mut model = create_test_model("| a | b |\n|---|---|\n| 1 | 2 |");
    let buffer = draw(&mut model);
    let rows = preview_rows(&buffer, &model);
    assert_eq!(rows[0].trim_end(), "a │ b");
    assert_eq!(rows[1].trim_end(), "──┼──");
    assert_eq!(rows[2].trim_end(), "1 │ 2");
}

#[test]
fn test_preview_renders_code_block_text() {
    let mut model = create_test_model("```rust\nfn main() {}\n```");
    let buffer = draw(&mut model);
    let rows = preview_rows(&buffer, &model);
    assert_eq!(rows[0].trim_end(), "fn main() {}");
}

#[test]
fn test_status_bar_shows_position_and_modified() {
    let model = create_test_model("abc\ndef");
    let mut model = update(model, Message::ClickEditor { line: 1, x: 2 });
    let buffer = draw(&mut model);
    let status = row_text(&buffer, HEIGHT - 1, 0, WIDTH);
    assert!(status.ends_with("[modified]  Ln 2, Col 3 "), "status was {status:?}");
}

#[test]
fn test_status_bar_shows_status_text() {
    let mut model = Model::new(Document::new(), (WIDTH, HEIGHT));
    model.set_status("Saved to notes.md");
    let buffer = draw(&mut model);
    let status = row_text(&buffer, HEIGHT - 1, 0, WIDTH);
    assert!(status.starts_with(" Saved to notes.md"));
    assert!(!status.contains("[modified]"));
}

#[test]
fn test_confirm_dialog_renders() {
    let model = create_test_model("draft");
    let mut model = update(model, Message::New);
    let text = screen_text(&draw(&mut model));
    assert!(text.contains(" Unsaved changes "));
    assert!(text.contains("Save changes to Untitled?"));
    assert!(text.contains("[Y]es  [N]o  [C]ancel"));
}

#[test]
fn test_save_as_prompt_renders_prefill() {
    let model = create_test_model("draft");
    let mut model = update(model, Message::SaveAs);
    let text = screen_text(&draw(&mut model));
    assert!(text.contains(" Save As "));
    assert!(text.contains("Path:"));
    assert!(text.contains("untitled.md"));
    assert!(text.contains("Enter: confirm  Esc: cancel"));
}

#[test]
fn test_notice_renders_message() {
    let mut model = create_test_model("");
    model.show_notice("Open failed", "cannot read missing.md: not found");
    let text = screen_text(&draw(&mut model));
    assert!(text.contains(" Open failed "));
    assert!(text.contains("cannot read missing.md: not found"));
    assert!(text.contains("Press any key"));
}

#[test]
fn test_menu_dropdown_renders_items_with_shortcuts() {
    let model = create_test_model("");
    let mut model = update(model, Message::OpenMenu(0));
    let buffer = draw(&mut model);
    let dropdown = menu_dropdown_rect(&model, 0);
    let rows: Vec<String> = (dropdown.y + 1..dropdown.y + dropdown.height - 1)
        .map(|y| row_text(&buffer, y, dropdown.x + 1, dropdown.x + dropdown.width - 1))
        .collect();
    assert_eq!(rows.len(), 5);
    assert!(rows[0].starts_with(" New") && rows[0].trim_end().ends_with("Ctrl+N"));
    assert!(rows[2].starts_with(" Save") && rows[2].trim_end().ends_with("Ctrl+S"));
    assert!(rows[3].starts_with(" Save As...") && rows[3].trim_end().ends_with("F12"));
    assert!(rows[4].starts_with(" Quit"));
}

#[test]
fn test_render_tiny_terminal_does_not_panic() {
    let mut model = Model::new(Document::from_text("# x\n\ny"), (3, 2));
    let mut terminal = Terminal::new(TestBackend::new(3, 2)).unwrap();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();
}
