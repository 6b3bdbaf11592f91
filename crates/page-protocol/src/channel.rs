//! Channel-name parsing
//!
//! The switch names channels `TECH/extension-serial` for station legs and
//! `Local/{exten}@{context}-serial;leg` for application legs. The gateway
//! needs the extension (or, for application legs, the context name) to
//! route events back to elements and paging conferences. Application
//! contexts contain one dash (`Paging-app`, `Paging-autoapp`), so the
//! Local form keeps the first two dash-separated tokens of the context.

use crate::error::ProtocolError;

/// Reduce a channel name to its extension or application-context name
pub fn channel_extension(channel: &str) -> Result<String, ProtocolError> {
    let malformed = || ProtocolError::MalformedChannel(channel.to_string());

    let (tech, rest) = channel.split_once('/').ok_or_else(malformed)?;
    if tech == "Local" {
        let (_, context) = rest.split_once('@').ok_or_else(malformed)?;
        let mut tokens = context.split('-');
        match (tokens.next(), tokens.next()) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Ok(format!("{a}-{b}")),
            _ => Err(malformed()),
        }
    } else {
        let extension = rest.split('-').next().filter(|s| !s.is_empty());
        extension.map(str::to_string).ok_or_else(malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_channel() {
        assert_eq!(channel_extension("PJSIP/101-00000001").unwrap(), "101");
    }

    #[test]
    fn local_application_channel() {
        assert_eq!(
            channel_extension("Local/999@Paging-app-00000af3;2").unwrap(),
            "Paging-app"
        );
        assert_eq!(
            channel_extension("Local/4@Paging-autoapp-0000;1").unwrap(),
            "Paging-autoapp"
        );
    }

    #[test]
    fn malformed_channels_are_rejected() {
        assert!(channel_extension("no-slash").is_err());
        assert!(channel_extension("Local/1@single").is_err());
        assert!(channel_extension("PJSIP/").is_err());
    }
}
