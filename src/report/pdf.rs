use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use crate::models::{Artifact, ExpiryState, PolicyVerdict};

type Rgb3 = (f32, f32, f32);

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 72.0;
const T_END: f32 = PAGE_W - MARGIN;

// ── Palette ───────────────────────────────────────────────────────────────────
const BG: Rgb3 = (1.00, 1.00, 1.00);
const PANEL: Rgb3 = (1.00, 1.00, 1.00);
const PANEL_ALT: Rgb3 = (0.95, 0.97, 0.98);
const PANEL_BORDER: Rgb3 = (0.85, 0.88, 0.91);
const ACCENT_TEAL: Rgb3 = (0.05, 0.55, 0.60);
const ACCENT_NAVY: Rgb3 = (0.12, 0.22, 0.48);
const TEXT_PRI: Rgb3 = (0.07, 0.08, 0.14);
const TEXT_SEC: Rgb3 = (0.36, 0.40, 0.52);
const TEXT_MUT: Rgb3 = (0.58, 0.63, 0.72);
const WHITE: Rgb3 = (1.00, 1.00, 1.00);
const WHITE_DIM: Rgb3 = (0.84, 0.93, 0.95);

const VALID_BG: Rgb3 = (0.90, 0.98, 0.92);
const VALID_FG: Rgb3 = (0.07, 0.52, 0.22);
const SOON_BG: Rgb3 = (1.00, 0.95, 0.87);
const SOON_FG: Rgb3 = (0.70, 0.40, 0.02);
const EXPIRED_BG: Rgb3 = (1.00, 0.91, 0.91);
const EXPIRED_FG: Rgb3 = (0.76, 0.09, 0.13);

const R_PANEL: f32 = 2.5;
const R_BADGE: f32 = 1.5;

// ── Status summary layout ─────────────────────────────────────────────────────
const C1_X: f32 = MARGIN;
const C2_X: f32 = MARGIN + 44.0;
const C3_X: f32 = MARGIN + 118.0;
const HDR_H: f32 = 9.0;
const LINE_H: f32 = 4.8;
const ROW_PAD: f32 = 4.5;
const BADGE_W: f32 = 37.0;
const BADGE_H: f32 = 6.5;
const DESC_WRAP: usize = 36;
const NAMES_WRAP: usize = 28;
const NAMES_MAX_LINES: usize = 4;

/// Render a PDF report: cover page → status summary → full artifact table.
pub fn render(
    artifacts: &[Artifact],
    project_path: &Path,
    output_path: &Path,
    now: DateTime<Utc>,
) -> Result<()> {
    let project_name = project_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Unknown Project");
    let as_of = now.format("%Y-%m-%d").to_string();

    let doc = PdfDocument::empty("Expiry Report");

    add_cover_page(&doc, artifacts, project_name, &as_of)?;
    add_status_summary_page(&doc, artifacts)?;
    add_table_pages(&doc, artifacts)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

fn count_state(artifacts: &[Artifact], state: Option<ExpiryState>) -> usize {
    artifacts
        .iter()
        .filter(|a| a.status.as_ref().map(|s| s.state) == state)
        .count()
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(
    doc: &PdfDocumentReference,
    artifacts: &[Artifact],
    project_name: &str,
    as_of: &str,
) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);

    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_NAVY, ACCENT_TEAL, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("expiry-checkr v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 44.0), Mm(PAGE_H - 10.5), &font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text("Expiry Tracking", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &font_b);

    // Project chip
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 106.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_TEAL);

    set_color(&layer, TEXT_MUT);
    layer.use_text("PROJECT", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), &font_b);
    set_color(&layer, TEXT_PRI);
    layer.use_text(truncate(project_name, 34), 9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), &font_b);

    set_color(&layer, TEXT_SEC);
    layer.use_text(format!("Evaluated as of  {}", as_of), 9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r);

    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, T_END, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    // Stat cards
    let card_y = rule_y - 42.0;
    let card_h = 26.0f32;
    let gap = 4.0f32;
    let card_w = (T_END - MARGIN - gap * 3.0) / 4.0;

    let cards: [(&str, String, Rgb3); 4] = [
        ("TOTAL", artifacts.len().to_string(), ACCENT_NAVY),
        ("VALID", count_state(artifacts, Some(ExpiryState::Valid)).to_string(), VALID_FG),
        ("EXPIRING SOON", count_state(artifacts, Some(ExpiryState::ExpiringSoon)).to_string(), SOON_FG),
        ("EXPIRED", count_state(artifacts, Some(ExpiryState::Expired)).to_string(), EXPIRED_FG),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent, &font_r, &font_b);
    }

    let unresolved = count_state(artifacts, None);
    if unresolved > 0 {
        set_color(&layer, TEXT_SEC);
        layer.use_text(
            format!(
                "{} artifact{} without a known expiry date need manual entry.",
                unresolved,
                if unresolved == 1 { "" } else { "s" }
            ),
            8.5, Mm(MARGIN), Mm(card_y - 7.0), &font_r,
        );
    }

    let section_y = card_y - 16.0;
    draw_hline(&layer, MARGIN, T_END, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("WHAT'S IN THIS REPORT", 6.5, Mm(MARGIN), Mm(section_y - 7.5), &font_b);

    let items = [
        ("Status Summary", "Artifacts grouped by expiry state"),
        ("All Artifacts", "Expiry dates, days remaining, renewal progress and verdict"),
    ];
    for (j, (title, desc)) in items.iter().enumerate() {
        let iy = section_y - 15.0 - j as f32 * 10.0;
        fill_rounded_rect(&layer, MARGIN, iy + 2.0, 2.0, 2.0, 1.0, ACCENT_TEAL);
        set_color(&layer, TEXT_PRI);
        layer.use_text(*title, 8.5, Mm(MARGIN + 5.0), Mm(iy + 2.0), &font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(*desc, 8.0, Mm(MARGIN + 5.0), Mm(iy - 3.5), &font_r);
    }

    draw_footer(&layer, &font_r);
    layer.use_text(as_of, 7.5, Mm(T_END - 22.0), Mm(15.0), &font_r);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: Rgb3,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), font_b);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

// ── Status summary page ───────────────────────────────────────────────────────

struct StateRow {
    name: &'static str,
    state: Option<ExpiryState>,
    description: &'static str,
    bg: Rgb3,
    fg: Rgb3,
}

fn add_status_summary_page(doc: &PdfDocumentReference, artifacts: &[Artifact]) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Status Summary");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_NAVY, ACCENT_TEAL, 21);

    let defs = [
        StateRow {
            name: "Expired",
            state: Some(ExpiryState::Expired),
            description: "Past the expiry instant. Renew or replace immediately.",
            bg: EXPIRED_BG, fg: EXPIRED_FG,
        },
        StateRow {
            name: "Expiring Soon",
            state: Some(ExpiryState::ExpiringSoon),
            description: "Inside the renewal window. Schedule the renewal now.",
            bg: SOON_BG, fg: SOON_FG,
        },
        StateRow {
            name: "Valid",
            state: Some(ExpiryState::Valid),
            description: "Outside the renewal window. Nothing to do yet.",
            bg: VALID_BG, fg: VALID_FG,
        },
        StateRow {
            name: "Unresolved",
            state: None,
            description: "No expiry date could be read. Enter it manually.",
            bg: PANEL_ALT, fg: TEXT_SEC,
        },
    ];

    // (row, description lines, name lines, height)
    let rows: Vec<(&StateRow, Vec<String>, Vec<String>, f32)> = defs
        .iter()
        .map(|d| {
            let names: Vec<String> = artifacts
                .iter()
                .filter(|a| a.status.as_ref().map(|s| s.state) == d.state)
                .map(|a| a.name.clone())
                .collect();
            let desc_lines = wrap_text(d.description, DESC_WRAP);
            let mut name_lines = format_name_list(&names, NAMES_WRAP);
            if name_lines.len() > NAMES_MAX_LINES {
                let count_line = name_lines.last().cloned().unwrap_or_default();
                name_lines.truncate(NAMES_MAX_LINES - 1);
                name_lines.push(count_line);
            }
            let n = desc_lines.len().max(name_lines.len()).max(2) as f32;
            (d, desc_lines, name_lines, n * LINE_H + ROW_PAD * 2.0)
        })
        .collect();

    const TABLE_TOP: f32 = 258.0;
    let total_h = HDR_H + rows.iter().map(|r| r.3).sum::<f32>();
    let table_bot = TABLE_TOP - total_h;
    let table_w = T_END - C1_X;

    set_color(&layer, TEXT_PRI);
    layer.use_text("Status Summary", 20.0, Mm(MARGIN), Mm(278.5), &font_b);
    set_color(&layer, TEXT_SEC);
    layer.use_text("All artifacts grouped by expiry state", 9.0, Mm(MARGIN), Mm(271.5), &font_r);
    draw_hline(&layer, MARGIN, T_END, 267.5, PANEL_BORDER);

    fill_rounded_rect(&layer, C1_X, table_bot, table_w, total_h, R_PANEL, PANEL);
    stroke_rounded_rect(&layer, C1_X, table_bot, table_w, total_h, R_PANEL, PANEL_BORDER);

    set_color(&layer, TEXT_SEC);
    layer.use_text("STATE", 7.0, Mm(C1_X + 4.0), Mm(TABLE_TOP - 6.2), &font_b);
    layer.use_text("WHAT IT MEANS", 7.0, Mm(C2_X + 2.0), Mm(TABLE_TOP - 6.2), &font_b);
    layer.use_text("ARTIFACTS", 7.0, Mm(C3_X + 2.0), Mm(TABLE_TOP - 6.2), &font_b);
    draw_hline(&layer, C1_X + R_PANEL, T_END - R_PANEL, TABLE_TOP - HDR_H, PANEL_BORDER);

    let mut y_top = TABLE_TOP - HDR_H;

    for (i, (def, desc_lines, name_lines, height)) in rows.iter().enumerate() {
        let y_bot = y_top - height;

        if i % 2 == 1 {
            fill_rect(&layer, C1_X, y_bot, table_w, *height, PANEL_ALT);
        }

        let badge_x = C1_X + 3.0;
        let badge_y = y_top - ROW_PAD - BADGE_H;
        fill_rounded_rect(&layer, badge_x, badge_y, BADGE_W, BADGE_H, R_BADGE, def.bg);
        set_color(&layer, def.fg);
        layer.use_text(def.name, 8.0, Mm(badge_x + 3.5), Mm(badge_y + 1.5), &font_b);

        set_color(&layer, TEXT_SEC);
        for (j, line) in desc_lines.iter().enumerate() {
            let ly = y_top - ROW_PAD - (j as f32 + 0.9) * LINE_H;
            layer.use_text(line.as_str(), 8.0, Mm(C2_X + 2.0), Mm(ly), &font_r);
        }

        // Names muted, count line last and bold
        let last = name_lines.len().saturating_sub(1);
        for (j, line) in name_lines.iter().enumerate() {
            let ly = y_top - ROW_PAD - (j as f32 + 0.9) * LINE_H;
            if j == last {
                set_color(&layer, TEXT_PRI);
                layer.use_text(line.as_str(), 9.0, Mm(C3_X + 2.0), Mm(ly), &font_b);
            } else {
                set_color(&layer, TEXT_MUT);
                layer.use_text(line.as_str(), 7.0, Mm(C3_X + 2.0), Mm(ly), &font_r);
            }
        }

        if i < rows.len() - 1 {
            draw_hline(&layer, C1_X + R_PANEL, T_END - R_PANEL, y_bot, PANEL_BORDER);
        }
        y_top = y_bot;
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

// ── Full artifact table pages ─────────────────────────────────────────────────

fn add_table_pages(doc: &PdfDocumentReference, artifacts: &[Artifact]) -> Result<()> {
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    const ROW_H: f32 = 7.0;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;
    const BAR_W: f32 = 26.0;

    //  NAME     KIND     EXPIRES   DAYS     COUNTDOWN   VERDICT
    //  18…68    68…92    92…114    114…130  130…166     166…192  (mm)
    let col_x = [MARGIN, MARGIN + 50.0, MARGIN + 74.0, MARGIN + 96.0, MARGIN + 112.0, MARGIN + 148.0];
    let headers = ["NAME", "KIND", "EXPIRES", "DAYS", "COUNTDOWN", "VERDICT"];

    let mut cur_y = FIRST_Y;
    let mut page: Option<(PdfPageIndex, PdfLayerIndex)> = None;
    let mut page_num: u32 = 0;

    for (row_idx, artifact) in artifacts.iter().enumerate() {
        let (pi, li) = match page {
            Some(current) if cur_y - ROW_H >= BOT_MARGIN => current,
            _ => {
                page_num += 1;
                let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Artifacts");
                let layer = doc.get_page(pi).get_layer(li);

                fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
                fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_NAVY, ACCENT_TEAL, 21);

                set_color(&layer, TEXT_PRI);
                layer.use_text("All Artifacts", 14.0, Mm(MARGIN), Mm(282.5), &font_b);
                set_color(&layer, TEXT_MUT);
                layer.use_text(format!("Page {}", page_num), 8.0, Mm(T_END - 14.0), Mm(283.0), &font_r);
                draw_hline(&layer, MARGIN, T_END, 277.5, PANEL_BORDER);

                fill_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL);
                stroke_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL_BORDER);
                set_color(&layer, TEXT_MUT);
                for (i, h) in headers.iter().enumerate() {
                    layer.use_text(*h, 7.0, Mm(col_x[i] + 1.5), Mm(HDR_Y - 4.0), &font_b);
                }

                draw_footer(&layer, &font_r);

                cur_y = FIRST_Y;
                page = Some((pi, li));
                (pi, li)
            }
        };
        let layer = doc.get_page(pi).get_layer(li);

        let (verdict_str, verdict_fg, verdict_bg) = match artifact.verdict {
            PolicyVerdict::Pass => ("PASS", VALID_FG, VALID_BG),
            PolicyVerdict::Warn => ("WARN", SOON_FG, SOON_BG),
            PolicyVerdict::Error => ("ERROR", EXPIRED_FG, EXPIRED_BG),
        };

        if row_idx % 2 == 0 {
            fill_rect(&layer, MARGIN, cur_y - ROW_H + 1.5, T_END - MARGIN, ROW_H, PANEL_ALT);
        }

        let text_y = cur_y - 4.0;

        set_color(&layer, TEXT_PRI);
        layer.use_text(truncate(&artifact.name, 30), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_r);
        set_color(&layer, TEXT_SEC);
        layer.use_text(artifact.kind.to_string(), 8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r);

        let expires = artifact
            .expires
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "manual entry".to_string());
        layer.use_text(expires, 8.0, Mm(col_x[2] + 1.5), Mm(text_y), &font_r);

        if let Some(status) = &artifact.status {
            let days_color = match status.state {
                ExpiryState::Expired => EXPIRED_FG,
                ExpiryState::ExpiringSoon => SOON_FG,
                ExpiryState::Valid => TEXT_SEC,
            };
            set_color(&layer, days_color);
            layer.use_text(status.days_until_expiry.to_string(), 8.0, Mm(col_x[3] + 1.5), Mm(text_y), &font_b);
        }

        // Renewal progress bar, certificates only
        if let Some(countdown) = &artifact.countdown {
            if let Some(progress) = countdown.progress_percentage {
                let bar_x = col_x[4] + 1.5;
                let bar_y = cur_y - ROW_H + 3.0;
                let fill = match countdown.state {
                    ExpiryState::Expired => EXPIRED_FG,
                    ExpiryState::ExpiringSoon => SOON_FG,
                    ExpiryState::Valid => VALID_FG,
                };
                fill_rounded_rect(&layer, bar_x, bar_y, BAR_W, 2.6, 1.3, PANEL_BORDER);
                let filled_w = BAR_W * (progress as f32 / 100.0);
                if filled_w > 0.0 {
                    fill_rounded_rect(&layer, bar_x, bar_y, filled_w, 2.6, 1.3, fill);
                }
                set_color(&layer, TEXT_MUT);
                layer.use_text(format!("{:.0}%", progress), 6.5, Mm(bar_x + BAR_W + 1.5), Mm(bar_y + 0.3), &font_r);
            }
        }

        let badge_x = col_x[5] + 1.5;
        let badge_y = cur_y - ROW_H + 2.2;
        fill_rounded_rect(&layer, badge_x, badge_y, 20.0, 4.8, R_BADGE, verdict_bg);
        set_color(&layer, verdict_fg);
        layer.use_text(verdict_str, 7.0, Mm(badge_x + 3.0), Mm(badge_y + 1.1), &font_b);

        draw_hline(&layer, MARGIN, T_END, cur_y - ROW_H + 1.5, PANEL_BORDER);

        cur_y -= ROW_H;
    }

    Ok(())
}

fn draw_footer(layer: &PdfLayerReference, font_r: &IndirectFontRef) {
    draw_hline(layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("expiry-checkr v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): Rgb3) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: Rgb3) {
    layer.set_fill_color(rgb(color));
}

fn paint(layer: &PdfLayerReference, ring: Vec<(Point, bool)>, mode: PaintMode) {
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode,
        winding_order: WindingOrder::NonZero,
    });
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb3) {
    layer.set_fill_color(rgb(color));
    paint(
        layer,
        vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ],
        PaintMode::Fill,
    );
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

/// Clockwise ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;

    let corners = [
        (x + w - r, y + r, 270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32, 90.0f32),
        (x + r, y + h - r, 90.0f32, 180.0f32),
        (x + r, y + r, 180.0f32, 270.0f32),
    ];

    corners
        .iter()
        .flat_map(|&(cx, cy, start, end)| {
            (0..=SEGS).map(move |i| {
                let angle = (start + (end - start) * i as f32 / SEGS as f32).to_radians();
                (Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false)
            })
        })
        .collect()
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    layer.set_fill_color(rgb(color));
    paint(layer, rounded_rect_ring(x, y, w, h, r), PaintMode::Fill);
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    paint(layer, rounded_rect_ring(x, y, w, h, r), PaintMode::Stroke);
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient made of `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: Rgb3,
    to: Rgb3,
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // Strips overlap slightly to hide rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}…", s.chars().take(max - 1).collect::<String>())
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Names wrapped into lines, then `<N> artifact(s)` as the final line.
fn format_name_list(names: &[String], max_chars: usize) -> Vec<String> {
    if names.is_empty() {
        return vec!["—".to_string()];
    }
    let mut lines = wrap_text(&names.join(", "), max_chars);
    lines.push(format!(
        "{} artifact{}",
        names.len(),
        if names.len() == 1 { "" } else { "s" }
    ));
    lines
}
