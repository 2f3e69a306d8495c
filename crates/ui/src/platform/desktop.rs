use std::process::Command;

use services::ShareError;

use super::UiLinkOpener;

pub struct DesktopLinkOpener;

impl UiLinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) -> Result<(), ShareError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ShareError::Open("empty url".to_string()));
        }
        let mut command = opener_command(url);
        command
            .spawn()
            .map(|_| ())
            .map_err(|err| ShareError::Open(err.to_string()))
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_is_rejected() {
        let err = DesktopLinkOpener.open_url("   ").unwrap_err();
        assert!(matches!(err, ShareError::Open(_)));
    }
}
