//! Line diff of artifact content for operator display.

/// Render the changed lines between `old` and `new`.
///
/// Output uses `-` for removed and `+` for added lines, in file order.
/// Unchanged lines are not shown. An empty string means no line changed.
pub fn line_diff(old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    // lcs[i][j] = LCS length of old_lines[i..] and new_lines[j..]
    let mut lcs = vec![vec![0usize; new_lines.len() + 1]; old_lines.len() + 1];
    for i in (0..old_lines.len()).rev() {
        for j in (0..new_lines.len()).rev() {
            lcs[i][j] = if old_lines[i] == new_lines[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = String::new();
    let (mut i, mut j) = (0, 0);
    while i < old_lines.len() && j < new_lines.len() {
        if old_lines[i] == new_lines[j] {
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            push_line(&mut out, '-', old_lines[i]);
            i += 1;
        } else {
            push_line(&mut out, '+', new_lines[j]);
            j += 1;
        }
    }
    for line in &old_lines[i..] {
        push_line(&mut out, '-', line);
    }
    for line in &new_lines[j..] {
        push_line(&mut out, '+', line);
    }
    out
}

fn push_line(out: &mut String, marker: char, line: &str) {
    out.push(marker);
    out.push_str(line);
    out.push('\n');
}
