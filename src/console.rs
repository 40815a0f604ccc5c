use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::census::ExtensionCensus;
use crate::error::CensusError;
use crate::format::{format_gib, truncate_unicode};
use crate::metrics::UNAVAILABLE;
use crate::system::cpu::CpuReport;
use crate::system::identity::{DATE_TIME_FORMAT, SystemReport};
use crate::system::memory::MemoryReport;
use crate::system::process::{ProcessReport, ProcessSample};
use crate::system::snapshot::CycleReport;

const RULE_WIDTH: usize = 60;
const PID_WIDTH: usize = 10;
const CENSUS_COLUMN: usize = 15;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn write_banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "{}", rule())?;
    writeln!(out, "{:=^width$}", format!(" {title} "), width = RULE_WIDTH)?;
    writeln!(out, "{}", rule())
}

fn write_section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", rule())
}

pub fn write_report<W: Write>(
    out: &mut W,
    report: &CycleReport,
    name_width: usize,
) -> io::Result<()> {
    writeln!(out)?;
    write_banner(out, "SYSTEM MONITOR")?;
    writeln!(out, "Date: {}", report.timestamp.format(DATE_TIME_FORMAT))?;

    write_cpu(out, &report.cpu)?;
    write_memory(out, report.memory.as_ref())?;
    write_system(out, &report.system)?;
    write_processes(out, &report.processes, name_width)
}

fn write_cpu<W: Write>(out: &mut W, cpu: &CpuReport) -> io::Result<()> {
    write_section(out, "PROCESSOR")?;
    writeln!(out, "Physical cores  : {}", cpu.physical_cores_label())?;
    writeln!(out, "Logical cores   : {}", cpu.logical_cores)?;
    writeln!(out, "Frequency       : {}", cpu.frequency_label())?;
    writeln!(out, "Max frequency   : {}", cpu.max_frequency_label())?;
    writeln!(out, "Usage           : {:.1}%", cpu.usage_percent)?;
    if !cpu.per_core_percent.is_empty() {
        let cores = cpu
            .per_core_percent
            .iter()
            .map(|p| format!("{p:.1}%"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "Per core        : {cores}")?;
    }
    Ok(())
}

fn write_memory<W: Write>(out: &mut W, memory: Option<&MemoryReport>) -> io::Result<()> {
    write_section(out, "MEMORY")?;
    let Some(memory) = memory else {
        return writeln!(out, "Memory information unavailable");
    };
    writeln!(out, "Used            : {}", format_gib(memory.used_bytes))?;
    writeln!(out, "Total           : {}", format_gib(memory.total_bytes))?;
    writeln!(out, "Available       : {}", format_gib(memory.available_bytes))?;
    writeln!(out, "Usage           : {:.1}%", memory.percent)
}

fn write_system<W: Write>(out: &mut W, system: &SystemReport) -> io::Result<()> {
    write_section(out, "SYSTEM")?;
    writeln!(out, "Hostname        : {}", system.hostname_label())?;
    writeln!(out, "OS              : {}", system.os)?;
    writeln!(
        out,
        "Distribution    : {}",
        system.os_long.as_deref().unwrap_or(UNAVAILABLE)
    )?;
    writeln!(out, "Boot time       : {}", system.boot_time_label())?;
    let uptime = system
        .uptime
        .map(|u| u.long())
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    writeln!(out, "Uptime          : {uptime}")?;
    writeln!(out, "Load average    : {}", system.load_average_label())?;
    writeln!(out, "Primary IP      : {}", system.ip_address_label())?;
    writeln!(out, "Logged-in users : {}", system.sessions.len())?;
    for line in system.session_lines() {
        writeln!(out, "  - {line}")?;
    }
    Ok(())
}

fn percent_cell(value: Option<f32>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn write_process_table<W: Write>(
    out: &mut W,
    title: &str,
    rows: &[ProcessSample],
    name_width: usize,
    columns: &[(&str, fn(&ProcessSample) -> Option<f32>)],
) -> io::Result<()> {
    let name_column = name_width + 1;
    writeln!(out)?;
    writeln!(out, "--- {title} ---")?;

    let mut header = format!("{:<PID_WIDTH$} {:<name_column$}", "PID", "NAME");
    for (i, (label, _)) in columns.iter().enumerate() {
        if i + 1 == columns.len() {
            header.push_str(&format!(" {label}"));
        } else {
            header.push_str(&format!(" {label:<10}"));
        }
    }
    writeln!(out, "{header}")?;
    let rule_len = PID_WIDTH + name_column + 11 * columns.len() + 1;
    writeln!(out, "{}", "-".repeat(rule_len))?;

    for row in rows {
        let name = truncate_unicode(&row.name, name_width);
        let mut line = format!("{:<PID_WIDTH$} {:<name_column$}", row.pid, name);
        for (i, (_, value)) in columns.iter().enumerate() {
            let cell = percent_cell(value(row));
            if i + 1 == columns.len() {
                line.push_str(&format!(" {cell}"));
            } else {
                line.push_str(&format!(" {cell:<10}"));
            }
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_processes<W: Write>(
    out: &mut W,
    report: &ProcessReport,
    name_width: usize,
) -> io::Result<()> {
    write_section(out, "PROCESSES")?;
    writeln!(out, "Running processes: {}", report.count)?;

    let cpu: fn(&ProcessSample) -> Option<f32> = |p| p.cpu_percent;
    let mem: fn(&ProcessSample) -> Option<f32> = |p| p.memory_percent;

    write_process_table(
        out,
        &format!("TOP {} PROCESSES BY CPU", report.top_cpu.len()),
        &report.top_cpu,
        name_width,
        &[("CPU %", cpu)],
    )?;
    write_process_table(
        out,
        &format!("TOP {} PROCESSES BY MEMORY", report.top_memory.len()),
        &report.top_memory,
        name_width,
        &[("MEM %", mem)],
    )?;
    write_process_table(
        out,
        &format!("TOP {} PROCESSES BY CPU + 2x MEMORY", report.top_combined.len()),
        &report.top_combined,
        name_width,
        &[("CPU %", cpu), ("MEM %", mem)],
    )
}

pub fn write_census<W: Write>(
    out: &mut W,
    result: &Result<ExtensionCensus, CensusError>,
) -> io::Result<()> {
    write_section(out, "FILE CENSUS")?;
    match result {
        Ok(census) => write_census_table(out, census),
        Err(err) => writeln!(out, "{err}"),
    }
}

fn write_census_table<W: Write>(out: &mut W, census: &ExtensionCensus) -> io::Result<()> {
    writeln!(out, "Directory: {}", census.root.display())?;
    writeln!(out, "Total files: {}", census.total)?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<CENSUS_COLUMN$} {:<CENSUS_COLUMN$} Percent",
        "Extension", "Count"
    )?;
    writeln!(out, "{}", "-".repeat(CENSUS_COLUMN * 3))?;
    for tracked in &census.tracked {
        writeln!(
            out,
            "{:<CENSUS_COLUMN$} {:<CENSUS_COLUMN$} {:.2}%",
            tracked.extension,
            tracked.count,
            census.percentage_of(tracked.count)
        )?;
    }
    let other = census.other();
    writeln!(
        out,
        "{:<CENSUS_COLUMN$} {:<CENSUS_COLUMN$} {:.2}%",
        "Other",
        other,
        census.percentage_of(other)
    )
}

pub fn write_footer<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    write_banner(out, "DONE")
}

pub fn write_shutdown<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out)?;
    write_banner(out, "MONITORING STOPPED")
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Blank input selects `default`.
pub fn census_root_from_input(input: &str, default: &Path) -> PathBuf {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}

/// Asks whether to run a census and where. `None` when declined.
pub async fn prompt_census_root(default: &Path) -> io::Result<Option<PathBuf>> {
    writeln!(io::stdout(), "\n{}", rule())?;
    let answer = read_line("Analyze a directory? (y/n): ".to_string()).await?;
    if !is_affirmative(&answer) {
        return Ok(None);
    }
    let prompt = format!("Directory path (default: {}): ", default.display());
    let path = read_line(prompt).await?;
    Ok(Some(census_root_from_input(&path, default)))
}

/// Reads stdin on the blocking pool so the caller can still observe Ctrl+C.
async fn read_line(prompt: String) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::ExtensionCount;
    use insta::assert_snapshot;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES \n"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
    }

    #[test]
    fn blank_path_uses_default() {
        let default = Path::new("/home/tester");
        assert_eq!(census_root_from_input("\n", default), default);
        assert_eq!(
            census_root_from_input("  /tmp/data \n", default),
            PathBuf::from("/tmp/data")
        );
    }

    #[test]
    fn banner_is_centered() {
        let output = render(|out| write_banner(out, "DONE"));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].chars().count(), RULE_WIDTH);
        assert!(lines[1].contains(" DONE "));
    }

    #[test]
    fn census_table_snapshot() {
        let census = ExtensionCensus {
            root: PathBuf::from("/data"),
            tracked: vec![
                ExtensionCount {
                    extension: ".txt".into(),
                    count: 3,
                },
                ExtensionCount {
                    extension: ".py".into(),
                    count: 2,
                },
                ExtensionCount {
                    extension: ".pdf".into(),
                    count: 0,
                },
                ExtensionCount {
                    extension: ".jpg".into(),
                    count: 1,
                },
            ],
            total: 10,
        };
        let output = render(|out| write_census_table(out, &census));
        assert_snapshot!(output, @r"
        Directory: /data
        Total files: 10

        Extension       Count           Percent
        ---------------------------------------------
        .txt            3               30.00%
        .py             2               20.00%
        .pdf            0               0.00%
        .jpg            1               10.00%
        Other           4               40.00%
        ");
    }

    #[test]
    fn cpu_section_shows_both_frequencies() {
        let report = CpuReport {
            physical_cores: Some(4),
            logical_cores: 8,
            frequency_mhz: Some(2400.0),
            max_frequency_mhz: None,
            usage_percent: 12.0,
            per_core_percent: vec![10.0, 14.0],
        };
        let output = render(|out| write_cpu(out, &report));
        assert!(output.contains("Frequency       : 2400.0 MHz"));
        assert!(output.contains("Max frequency   : N/A"));
        assert!(output.contains("Per core        : 10.0% 14.0%"));
    }

    #[test]
    fn census_errors_are_printed() {
        let result = Err(CensusError::NoFiles(PathBuf::from("/empty")));
        let output = render(|out| write_census(out, &result));
        assert!(output.contains("No files found in '/empty'"));
    }

    #[test]
    fn process_rows_are_truncated_and_aligned() {
        let report = ProcessReport {
            count: 1,
            top_cpu: vec![ProcessSample {
                pid: 4242,
                name: "an_extremely_long_process_name".into(),
                cpu_percent: Some(12.5),
                memory_percent: None,
            }],
            top_memory: Vec::new(),
            top_combined: Vec::new(),
        };
        let output = render(|out| write_processes(out, &report, 10));
        assert!(output.contains("--- TOP 1 PROCESSES BY CPU ---"));
        assert!(output.contains("4242       an_extrem\u{2026}  12.50"));
        assert!(output.contains("PID        NAME        CPU %"));
    }
}
