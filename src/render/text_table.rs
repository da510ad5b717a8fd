//! 终端结果表

use std::fmt::Write as _;

use crate::models::{format_lap_time, DerivedRow};

/// 终端表格输出
pub struct TextTable;

impl TextTable {
    /// 生成表格文本，行顺序与输入一致
    pub fn render(rows: &[DerivedRow]) -> String {
        let team_width = rows
            .iter()
            .map(|r| r.team.chars().count())
            .max()
            .unwrap_or(0)
            .max("Team".len());

        let header = format!(
            "{:<6} {:<team_width$} {:>9} {:>9}  {}",
            "Driver", "Team", "LapTime", "Delta", "Status"
        );
        let mut out = String::new();
        let _ = writeln!(out, "{}", header);
        let _ = writeln!(out, "{}", "-".repeat(header.chars().count()));

        for row in rows {
            let status = match row.dnf_note() {
                Some(note) => format!("{} ({})", row.status_text(), note),
                None => row.status_text().to_string(),
            };
            let _ = writeln!(
                out,
                "{:<6} {:<team_width$} {:>9} {:>9}  {}",
                row.driver,
                row.team,
                format_lap_time(row.fastest_lap),
                format!("+{:.3}", row.delta),
                status
            );
        }
        out
    }

    /// 打印到标准输出
    pub fn print(rows: &[DerivedRow]) {
        print!("{}", Self::render(rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::row;

    #[test]
    fn test_table_has_header_and_one_line_per_row() {
        let rows = vec![
            row("C", 4.5, "Accident", true),
            row("A", 0.0, "Finished", false),
        ];
        let table = TextTable::render(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Driver"));
        assert!(lines[2].starts_with("C "));
        assert!(lines[2].contains("+4.500"));
        assert!(lines[2].contains("Accident (DNF on lap 23 of 52)"));
        assert!(lines[3].contains("1:30.000"));
        assert!(lines[3].ends_with("Finished"));
    }

    #[test]
    fn test_separator_matches_header_width() {
        let rows = vec![row("A", 0.0, "Finished", false)];
        let table = TextTable::render(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[1].chars().count(), lines[0].chars().count());
    }
}
