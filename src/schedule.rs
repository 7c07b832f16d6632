//! Instructions for running the digest every morning at 08:30.
//!
//! Nothing is installed; the guide is printed for the operator to apply.

use std::fmt::{self, Write};
use std::path::Path;

/// Crontab line running `exe --send` from `workdir` at 08:30 daily.
pub fn cron_line(workdir: &Path, exe: &Path) -> String {
    format!(
        "30 8 * * * cd {} && {} --send >> /var/log/tech-news.log 2>&1",
        workdir.display(),
        exe.display()
    )
}

/// Full guide covering crontab, systemd timers and Windows Task Scheduler.
pub fn cron_guide(workdir: &Path, exe: &Path) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_guide(&mut out, workdir, exe);
    out
}

fn write_guide(out: &mut String, workdir: &Path, exe: &Path) -> fmt::Result {
    let rule = "=".repeat(60);
    writeln!(out, "📅 定时任务设置指南:")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "方法1: 使用crontab（Linux/Mac）")?;
    writeln!(out, "  1. 运行: crontab -e")?;
    writeln!(out, "  2. 添加以下行:")?;
    writeln!(out, "     {}", cron_line(workdir, exe))?;
    writeln!(out)?;
    writeln!(out, "方法2: 使用systemd timer（Linux）")?;
    writeln!(out, "  1. 创建服务文件: /etc/systemd/system/tech-news.service")?;
    writeln!(out, "     ExecStart={} --send", exe.display())?;
    writeln!(out, "     WorkingDirectory={}", workdir.display())?;
    writeln!(out, "  2. 创建定时器: /etc/systemd/system/tech-news.timer")?;
    writeln!(out, "     OnCalendar=*-*-* 08:30:00")?;
    writeln!(out, "  3. 启用定时器: systemctl enable tech-news.timer")?;
    writeln!(out)?;
    writeln!(out, "方法3: 使用Windows任务计划程序")?;
    writeln!(out, "  1. 打开任务计划程序")?;
    writeln!(out, "  2. 创建基本任务")?;
    writeln!(out, "  3. 设置程序: {}", exe.display())?;
    writeln!(out, "  4. 设置参数: --send")?;
    writeln!(out, "{rule}")
}
