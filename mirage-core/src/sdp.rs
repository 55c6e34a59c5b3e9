//! Session-description rewriting for the outgoing video policy.
//!
//! Bitrate and framerate bounds are expressed in the offer itself: `b=AS` and
//! `b=TIAS` lines and `a=framerate` on every video section, plus
//! `x-google-min-bitrate` / `x-google-max-bitrate` format parameters on the
//! payload types of the preferred codec. Other media sections pass through
//! untouched.

use crate::model::VideoSenderPolicy;

/// Rewrite `sdp` so its video sections carry the bounds of `policy`.
pub fn apply_video_policy(sdp: &str, policy: &VideoSenderPolicy) -> String {
    let eol = if sdp.contains("\r\n") { "\r\n" } else { "\n" };
    let lines: Vec<&str> = sdp.lines().filter(|l| !l.is_empty()).collect();

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 8);
    let mut start = 0;
    while start < lines.len() {
        let end = lines[start + 1..]
            .iter()
            .position(|l| l.starts_with("m="))
            .map_or(lines.len(), |p| start + 1 + p);

        let section = &lines[start..end];
        if section[0].starts_with("m=video") {
            out.extend(rewrite_video_section(section, policy));
        } else {
            out.extend(section.iter().map(|l| (*l).to_owned()));
        }
        start = end;
    }

    let mut result = out.join(eol);
    result.push_str(eol);
    result
}

/// Payload types mapped to `encoding_name` by `a=rtpmap` lines.
pub fn payload_types_for(lines: &[&str], encoding_name: &str) -> Vec<u8> {
    lines
        .iter()
        .filter_map(|l| l.strip_prefix("a=rtpmap:"))
        .filter_map(|rest| {
            let (pt, codec) = rest.split_once(' ')?;
            let name = codec.split('/').next()?;
            if name.eq_ignore_ascii_case(encoding_name) {
                pt.trim().parse().ok()
            } else {
                None
            }
        })
        .collect()
}

fn rewrite_video_section(section: &[&str], policy: &VideoSenderPolicy) -> Vec<String> {
    let payload_types = payload_types_for(section, policy.encoding_name());
    let min_kbps = policy.min_bitrate_bps / 1000;
    let max_kbps = policy.max_bitrate_bps / 1000;
    let bitrate_params = format!(
        "x-google-min-bitrate={};x-google-max-bitrate={}",
        min_kbps, max_kbps
    );

    let bandwidth = [
        format!("b=AS:{}", max_kbps),
        format!("b=TIAS:{}", policy.max_bitrate_bps),
        format!("a=framerate:{}", policy.max_framerate),
    ];

    let has_fmtp = |pt: u8| {
        let prefix = format!("a=fmtp:{} ", pt);
        section.iter().any(|l| l.starts_with(&prefix))
    };

    let mut out = Vec::with_capacity(section.len() + bandwidth.len() + payload_types.len());
    let mut bandwidth_written = false;

    for (i, line) in section.iter().enumerate() {
        if i > 0 && (line.starts_with("b=") || line.starts_with("a=framerate:")) {
            continue;
        }

        if i > 0 && line.starts_with("a=") && !bandwidth_written {
            out.extend(bandwidth.iter().cloned());
            bandwidth_written = true;
        }

        if let Some(rest) = line.strip_prefix("a=fmtp:") {
            let pt = rest.split(' ').next().and_then(|p| p.parse::<u8>().ok());
            if pt.is_some_and(|pt| payload_types.contains(&pt)) && !rest.contains("x-google-") {
                out.push(format!("{};{}", line, bitrate_params));
                continue;
            }
        }

        out.push((*line).to_owned());

        if let Some(rest) = line.strip_prefix("a=rtpmap:") {
            let pt = rest.split(' ').next().and_then(|p| p.parse::<u8>().ok());
            if let Some(pt) = pt.filter(|pt| payload_types.contains(pt) && !has_fmtp(*pt)) {
                out.push(format!("a=fmtp:{} {}", pt, bitrate_params));
            }
        }
    }

    if !bandwidth_written {
        out.extend(bandwidth.iter().cloned());
    }
    out
}
