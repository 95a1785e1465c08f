//! HTML email digest.
//!
//! The digest is a pure function of its inputs: no timestamps, no ids, so
//! two builds from the same notices are byte-identical. Notice fields are
//! inserted as scraped, without escaping.

use crate::models::{PowerNotice, WaterNotice};
use std::fmt::Write;

const VIK_HEADING: &str = "🔵 ВиК - Велико Търново";
const ENERGO_PRO_HEADING: &str = "🟠 Енерго Про - Велико Търново";
const NO_WATER: &str = "ℹ️ Няма нови ВиК прекъсвания.";
const NO_POWER: &str = "ℹ️ Няма нови електро прекъсвания.";
const READ_MORE: &str = "Прочети повече";
const FOOTER: &str = "<footer><p style=\"font-size: 12px; color: #888;\">\
Това е автоматично съобщение. За повече информация посетете официалните сайтове.\
</p></footer>";

/// Build the full HTML document for one run.
///
/// # Arguments
///
/// * `water` - Notices from ВиК, rendered first
/// * `power` - Notices from Енерго Про
pub fn build_digest(water: &[WaterNotice], power: &[PowerNotice]) -> String {
    let mut html = String::from("<!DOCTYPE html><html><body>");
    write_vik_section(&mut html, water);
    write_energo_pro_section(&mut html, power);
    html.push_str(FOOTER);
    html.push_str("</body></html>");
    html
}

fn write_vik_section(html: &mut String, notices: &[WaterNotice]) {
    write!(html, "<div><h2>{VIK_HEADING}</h2>").unwrap();
    if notices.is_empty() {
        write!(html, "<p>{NO_WATER}</p>").unwrap();
    }
    for notice in notices {
        write!(
            html,
            "<p><strong>📅 {}</strong><br>📝 {}<br>📄 {}<br>🔗 <a href=\"{}\">{READ_MORE}</a></p><hr>",
            notice.date, notice.title, notice.text, notice.link
        )
        .unwrap();
    }
    html.push_str("</div>");
}

fn write_energo_pro_section(html: &mut String, notices: &[PowerNotice]) {
    write!(html, "<div><h2>{ENERGO_PRO_HEADING}</h2>").unwrap();
    if notices.is_empty() {
        write!(html, "<p>{NO_POWER}</p>").unwrap();
    }
    for notice in notices {
        write!(html, "<p>🕒 {}<br>📄 {}</p><hr>", notice.period, notice.text).unwrap();
    }
    html.push_str("</div>");
}
