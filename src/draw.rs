//! Bitmap rendering of evaluators and suites.
//!
//! One evaluator renders as a single row: a fixed label column, neutral
//! rectangles for still-unmarked segments, green/red fills for matched and
//! missed entries, and a light cursor line. A suite tiles a heading row with
//! frame-number labels over one row per evaluator; sequence boundaries show
//! as vertical separators.
//!
//! The surface is an `image::RgbImage`; labels come from a small embedded
//! 5x7 glyph table (digits, upper-case letters and a few separators), which
//! covers everything the renderer ever prints.

use image::{Rgb, RgbImage};

use crate::track_test::SegmentTrackTest;
use crate::suite::{TestSuite, TrackTest};
use crate::VideoTime;

/// Width of the fixed label column on the left.
pub const DRAW_HEADER_WIDTH: u32 = 100;

/// Drawing surface.
pub type Surface = RgbImage;

const BACKGROUND: Rgb<u8> = Rgb([70, 70, 70]);
const HEADER_FILL: Rgb<u8> = Rgb([60, 60, 60]);
const UNMARKED_FILL: Rgb<u8> = Rgb([84, 84, 84]);
const SEGMENT_MATCH: Rgb<u8> = Rgb([84, 200, 84]);
const SEGMENT_MISS: Rgb<u8> = Rgb([200, 84, 84]);
const ASSERT_MATCH: Rgb<u8> = Rgb([30, 120, 30]);
const ASSERT_MISS: Rgb<u8> = Rgb([120, 30, 30]);
const CURSOR_LINE: Rgb<u8> = Rgb([220, 220, 220]);
const RULER_TICK: Rgb<u8> = Rgb([120, 120, 120]);
const LABEL_TEXT: Rgb<u8> = Rgb([200, 200, 200]);
const HEADING_TEXT: Rgb<u8> = Rgb([150, 150, 150]);
const SEQUENCE_DELIMITER: Rgb<u8> = Rgb([100, 100, 100]);

/// Axis-aligned filled rectangle, clipped to the surface.
fn fill_rect(surface: &mut Surface, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
    if w <= 0 || h <= 0 {
        return;
    }
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(surface.width() as i64);
    let y1 = (y + h).min(surface.height() as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            surface.put_pixel(px as u32, py as u32, color);
        }
    }
}

fn vline(surface: &mut Surface, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
    fill_rect(surface, x, y0, 1, y1 - y0, color);
}

// 5x7 glyphs, one byte per row, low 5 bits used.
const GLYPH_W: i64 = 5;
const GLYPH_SPACING: i64 = 1;

fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '-' => [0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        ' ' => [0x00; 7],
        _ => return None,
    };
    Some(rows)
}

/// Rasterize `text` with its top-left corner at `(x, y)`. Characters
/// without a glyph advance silently.
fn draw_text(surface: &mut Surface, text: &str, x: i64, y: i64, color: Rgb<u8>) {
    let mut cx = x;
    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (ry, row) in rows.iter().enumerate() {
                for rx in 0..GLYPH_W {
                    if row & (1 << (GLYPH_W - 1 - rx)) != 0 {
                        let px = cx + rx;
                        let py = y + ry as i64;
                        if px >= 0
                            && py >= 0
                            && (px as u32) < surface.width()
                            && (py as u32) < surface.height()
                        {
                            surface.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
        cx += GLYPH_W + GLYPH_SPACING;
    }
}

fn truncated(text: &str) -> String {
    text.chars().take(9).collect()
}

impl SegmentTrackTest<'_> {
    /// Render this evaluator as one row: `frame_count` frames starting at
    /// `frame_position` of the sequence at `seq_index`, continuing into the
    /// following sequences when the window runs past the end.
    pub fn draw(
        &self,
        seq_index: usize,
        frame_position: VideoTime,
        frame_count: VideoTime,
        pixels_per_frame: u32,
        row_height: u32,
    ) -> Surface {
        let data = self.data();
        let header = self.header();
        let ppf = pixels_per_frame as i64;
        let width = DRAW_HEADER_WIDTH + pixels_per_frame * frame_count as u32;
        let mut surface = RgbImage::from_pixel(width, row_height, BACKGROUND);
        let rh = row_height as i64;

        fill_rect(&mut surface, 0, 0, DRAW_HEADER_WIDTH as i64, rh - 1, HEADER_FILL);
        if let Some(h) = data.header(header) {
            draw_text(&mut surface, &truncated(h.name()), 10, rh / 2 - 4, LABEL_TEXT);
        }

        let Some(start_seq) = data.sequence_at(seq_index) else {
            return surface;
        };

        // Cursor position relative to the drawn sequence: fully swept
        // sequences show their cursor at the end, future ones at 0.
        let cursor_position = if seq_index < self.cursor_sequence() {
            start_seq.length()
        } else if seq_index == self.cursor_sequence() {
            self.cursor_position()
        } else {
            0
        };

        let frame_end = frame_position + frame_count;

        // Unmarked segments: walk from the cursor, peeking backwards over
        // segments that still reach past it.
        let mut si = seq_index;
        let mut track = Self::track_in(data, header, si);
        let mut it = track.segment_from(cursor_position);
        while it > 0 {
            let prev = &track.segments()[it - 1];
            if prev.end() <= cursor_position {
                break;
            }
            it -= 1;
        }

        let mut seq_offset: VideoTime = 0;
        loop {
            if it >= track.total_segments() {
                seq_offset += data.sequence_at(si).map(|s| s.length()).unwrap_or(0);
                si += 1;
                if si >= data.sequence_count() {
                    break;
                }
                track = Self::track_in(data, header, si);
                it = 0;
            } else {
                let segment = &track.segments()[it];
                if seq_offset + segment.position() > frame_end {
                    break;
                }
                if self.is_unmarked(si, segment.id()) {
                    let mut start = segment.position() - frame_position + seq_offset;
                    let mut len = segment.length();
                    if start < 0 {
                        len += start;
                        start = 0;
                    }
                    fill_rect(
                        &mut surface,
                        DRAW_HEADER_WIDTH as i64 + start * ppf,
                        0,
                        len * ppf,
                        rh,
                        UNMARKED_FILL,
                    );
                }
                it += 1;
            }
        }

        // Assertions and their referenced segments.
        let mut si = seq_index;
        let mut ai = 0;
        let mut seq_offset: VideoTime = 0;
        'outer: while si < data.sequence_count() {
            let log = self.assertions(si);
            if ai >= log.len() {
                seq_offset += data.sequence_at(si).map(|s| s.length()).unwrap_or(0);
                si += 1;
                ai = 0;
                continue;
            }
            let assertion = &log[ai];
            let fill = if assertion.result() == crate::AssertionResult::Match {
                (SEGMENT_MATCH, ASSERT_MATCH)
            } else {
                (SEGMENT_MISS, ASSERT_MISS)
            };

            if let Some(id) = assertion.segment() {
                let track = Self::track_in(data, header, si);
                if let Some(segment) = track.segment_by_id(id)
                    && seq_offset + segment.end() > frame_position
                {
                    let mut start = segment.position() - frame_position + seq_offset;
                    let mut len = segment.length();
                    if start < 0 {
                        len += start;
                        start = 0;
                    }
                    fill_rect(
                        &mut surface,
                        DRAW_HEADER_WIDTH as i64 + start * ppf,
                        0,
                        len * ppf,
                        rh,
                        fill.0,
                    );
                }
            }

            if seq_offset + assertion.position() + assertion.length() > frame_position {
                let mut start = assertion.position() - frame_position + seq_offset;
                let mut len = assertion.length();
                if start < 0 {
                    len += start;
                    start = 0;
                }
                fill_rect(
                    &mut surface,
                    DRAW_HEADER_WIDTH as i64 + start * ppf,
                    0,
                    len * ppf,
                    rh,
                    fill.1,
                );
            }

            if seq_offset + assertion.position() >= frame_end {
                break 'outer;
            }
            ai += 1;
        }

        // Cursor line for the drawn sequence.
        if seq_index == self.cursor_sequence()
            && cursor_position >= frame_position
            && cursor_position < frame_end
        {
            let x = DRAW_HEADER_WIDTH as i64 + (cursor_position - frame_position) * ppf;
            vline(&mut surface, x, 0, rh, CURSOR_LINE);
        }

        surface
    }
}

impl TestSuite<'_> {
    /// Render the whole suite: a heading row with the suite name and frame
    /// labels, then one row per evaluator. Label strides adapt to the zoom
    /// in a 1/2x/5x/10x ladder.
    pub fn draw(
        &self,
        seq_index: usize,
        frame_position: VideoTime,
        frame_count: VideoTime,
        pixels_per_frame: u32,
        row_height: u32,
    ) -> Surface {
        let data = self.data();
        let row_height = row_height.max(10);
        let ppf = pixels_per_frame.max(1) as i64;
        let width = DRAW_HEADER_WIDTH + ppf as u32 * frame_count as u32;
        let height = row_height * (self.test_count() as u32 + 1);
        let mut surface = RgbImage::from_pixel(width, height, BACKGROUND);
        let rh = row_height as i64;

        let Some(start_seq) = data.sequence_at(seq_index) else {
            return surface;
        };
        if frame_position >= start_seq.length() {
            return surface;
        }

        draw_text(&mut surface, &truncated(self.name()), 10, rh / 2 - 4, HEADING_TEXT);

        // Evaluator rows.
        for (row, test) in self.tests().iter().enumerate() {
            let strip = match test {
                TrackTest::Segment(t) => t.draw(
                    seq_index,
                    frame_position,
                    frame_count,
                    ppf as u32,
                    row_height,
                ),
            };
            image::imageops::replace(
                &mut surface,
                &strip,
                0,
                (row as i64 + 1) * rh,
            );
        }

        // Frame markers and labels with adaptive stride.
        let min_label_distance: i64 = 100;
        let text_distance = min_label_distance.max(ppf);
        let frame_divider = text_distance / ppf;
        let mut labeled: i64 = 1;
        while labeled < frame_divider {
            if labeled * 2 >= frame_divider {
                labeled *= 2;
                break;
            }
            if labeled * 5 >= frame_divider {
                labeled *= 5;
                break;
            }
            labeled *= 10;
        }
        let marked = (labeled / 4).max(1);

        let mut current = frame_position;
        let mut si = seq_index;
        for i in 0..frame_count {
            let seq_length = match data.sequence_at(si) {
                Some(s) => s.length(),
                None => break,
            };
            let marker_x = DRAW_HEADER_WIDTH as i64 + i * ppf;

            if current % labeled == 0 && current + labeled <= seq_length {
                vline(&mut surface, marker_x, rh - 5, rh, RULER_TICK);
                let (label, label_x) = if current == 0 {
                    ("0".to_string(), marker_x + 3)
                } else {
                    (format!("{current:05}"), marker_x - 15)
                };
                draw_text(&mut surface, &label, label_x, rh - 17, LABEL_TEXT);
            } else if current == seq_length - 1 {
                draw_text(
                    &mut surface,
                    &format!("{current:05}"),
                    marker_x - 30,
                    rh - 17,
                    HEADING_TEXT,
                );
            }
            if current % marked == 0 {
                vline(&mut surface, marker_x, rh - 2, rh, RULER_TICK);
            }

            current += 1;
            if current >= seq_length {
                current = 0;
                si += 1;
                let delimiter_x = DRAW_HEADER_WIDTH as i64 + i * ppf + ppf;
                vline(&mut surface, delimiter_x, 0, height as i64, SEQUENCE_DELIMITER);
                if si >= data.sequence_count() {
                    break;
                }
            }
        }

        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataFile, Segment, Sequence, SequenceKind, SEGMENT_TRACK_TYPE};

    fn region_is(surface: &Surface, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) -> bool {
        (y..y + h).all(|py| (x..x + w).all(|px| *surface.get_pixel(px, py) == color))
    }

    fn sample() -> (DataFile, crate::HeaderId) {
        let mut dfile = DataFile::new();
        let header = dfile.append_track(SEGMENT_TRACK_TYPE, "Track").unwrap();
        for path in ["test1", "test2"] {
            dfile
                .append_sequence(Sequence::new(
                    path,
                    "StandardVideoDecoder",
                    SequenceKind::Video,
                    200,
                ))
                .unwrap();
        }
        {
            let track = dfile.segment_track_mut(0, header).unwrap();
            track.insert_segment(Segment::with_length(20, 50)).unwrap();
            track.insert_segment(Segment::with_length(80, 100)).unwrap();
            track.insert_segment(Segment::with_length(30, 30)).unwrap();
        }
        {
            let track = dfile.segment_track_mut(1, header).unwrap();
            track.insert_segment(Segment::with_length(10, 10)).unwrap();
            track.insert_segment(Segment::with_length(25, 20)).unwrap();
        }
        (dfile, header)
    }

    #[test]
    fn unmarked_segments_render_gray() {
        let (dfile, header) = sample();
        let test = crate::SegmentTrackTest::new(&dfile, header).unwrap();
        let surface = test.draw(0, 0, 100, 10, 30);

        assert_eq!(surface.width(), DRAW_HEADER_WIDTH + 10 * 100);
        assert_eq!(surface.height(), 30);
        assert!(region_is(
            &surface,
            DRAW_HEADER_WIDTH + 10 * 20,
            0,
            10 * 30,
            30,
            UNMARKED_FILL
        ));
    }

    #[test]
    fn matched_and_missed_stamps_render_colored() {
        let (dfile, header) = sample();
        let mut test = crate::SegmentTrackTest::new(&dfile, header).unwrap();
        test.single_stamp(10, "", "", 0).unwrap();
        test.single_stamp(50, "", "", 0).unwrap();

        let surface = test.draw(0, 0, 100, 10, 30);
        assert!(region_is(
            &surface,
            DRAW_HEADER_WIDTH + 10 * 10,
            0,
            10,
            30,
            ASSERT_MISS
        ));
        assert!(region_is(
            &surface,
            DRAW_HEADER_WIDTH + 10 * 50,
            0,
            10,
            30,
            ASSERT_MATCH
        ));
        // The matched segment shows green around its assertion.
        assert!(region_is(
            &surface,
            DRAW_HEADER_WIDTH + 10 * 20,
            0,
            10 * 10,
            30,
            SEGMENT_MATCH
        ));
    }

    #[test]
    fn suite_surface_dimensions_and_rows() {
        let (dfile, header) = sample();
        let mut suite = crate::TestSuite::new(&dfile, "Test");
        {
            let test = suite.add_segment_test(header).unwrap();
            test.single_stamp(10, "", "", 0).unwrap();
            test.single_stamp(50, "", "", 0).unwrap();
            test.advance_cursor_sequence(1, "", 0).unwrap();
            test.single_stamp(15, "", "", 0).unwrap();
        }

        let surface = suite.draw(0, 160, 100, 10, 30);
        assert_eq!(surface.width(), DRAW_HEADER_WIDTH + 10 * 100);
        assert_eq!(surface.height(), 30 * 2);

        // Out-of-range start frame renders an empty background surface.
        let blank = suite.draw(0, 200, 100, 10, 30);
        assert!(region_is(&blank, 0, 0, blank.width(), blank.height(), BACKGROUND));
    }

    #[test]
    fn cursor_line_is_drawn() {
        let (dfile, header) = sample();
        let mut test = crate::SegmentTrackTest::new(&dfile, header).unwrap();
        test.advance_cursor_position(5, "", 0).unwrap();
        let surface = test.draw(0, 0, 100, 10, 30);
        assert!(region_is(
            &surface,
            DRAW_HEADER_WIDTH + 10 * 5,
            0,
            1,
            30,
            CURSOR_LINE
        ));
    }
}
