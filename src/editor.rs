use std::fs;
use std::process::Command;

/// Opens `$EDITOR` (default `vim`) on `initial_content` and returns the saved text.
pub fn open_editor(initial_content: &str) -> Result<String, String> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

    let tmp_dir = std::env::temp_dir();
    let tmp_file = tmp_dir.join(format!("quizrun_{}.md", std::process::id()));

    fs::write(&tmp_file, initial_content)
        .map_err(|e| format!("Cannot write temp file: {}", e))?;

    let status = Command::new(&editor)
        .arg(&tmp_file)
        .status()
        .map_err(|e| format!("Cannot open editor '{}': {}", editor, e))?;

    if !status.success() {
        let _ = fs::remove_file(&tmp_file);
        return Err(format!("Editor '{}' exited with {}", editor, status));
    }

    let result = fs::read_to_string(&tmp_file)
        .map_err(|e| format!("Cannot read editor result: {}", e))?;

    let _ = fs::remove_file(&tmp_file);
    Ok(strip_final_newline(result))
}

/// Editors append a newline on save; the draft should not grow one per round trip.
fn strip_final_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
