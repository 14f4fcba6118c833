use crate::ir::{PregnancyKind, Sex, Status};

use super::annotations::{annotation_lines, is_ectopic};
use super::svg::{Anchor, TextStyle, sid};
use super::{Painter, Placed};

const ARROW_LENGTH: f32 = 18.0;
const ARROW_HEAD_LENGTH: f32 = 10.0;
const ARROW_HEAD_WIDTH: f32 = 7.0;
const ANNOTATION_LINE_HEIGHT: f32 = 14.0;

impl Painter<'_> {
    /// Symbol, status marks and annotation text for one individual.
    pub(super) fn draw_person(&mut self, placed: Placed<'_>) {
        let person = placed.person;
        let (cx, cy) = (placed.x(), placed.y());
        let half = self.symbol_size / 2.0;
        let affected = person.has(Status::Affected);
        let fill = if affected {
            self.theme.affected_fill.clone()
        } else {
            "none".to_string()
        };
        // Marks drawn on top of a filled symbol switch to the background color.
        let mark_color = if affected {
            self.theme.background.clone()
        } else {
            self.theme.text_color.clone()
        };
        let kind = person.pregnancy.as_ref().and_then(|p| p.kind.as_ref());
        let ectopic = is_ectopic(person);

        if person.has(Status::Miscarriage) || person.has(Status::Abortion) || ectopic {
            let r = half * 0.9;
            self.svg.polygon(
                &sid(&["sym", placed.id()]),
                &[(cx, cy - r), (cx + r, cy + r), (cx - r, cy + r)],
                &fill,
                true,
            );
            if person.has(Status::Abortion) || kind == Some(&PregnancyKind::Top) {
                let r = half * 0.8;
                let color = if affected {
                    Some(self.theme.background.as_str())
                } else {
                    None
                };
                self.svg.line_styled(
                    &sid(&["slash", placed.id()]),
                    (cx - r, cy + r),
                    (cx + r, cy - r),
                    color,
                    None,
                );
            }
        } else {
            self.draw_sex_symbol(person.sex, cx, cy, &fill);
            if person.has(Status::Pregnancy) && !person.has(Status::Stillbirth) {
                self.inner_mark(placed, "P", &mark_color);
            }
        }

        if person.has(Status::Donor) {
            self.inner_mark(placed, "D", &mark_color);
        }
        if person.has(Status::Surrogate) {
            self.inner_mark(placed, "S", &mark_color);
        }

        if person.has(Status::Deceased) || person.has(Status::Stillbirth) {
            self.svg.line(
                &sid(&["deceased", placed.id()]),
                (cx - half - 6.0, cy + half + 6.0),
                (cx + half + 6.0, cy - half - 6.0),
            );
        }

        if person.has(Status::Carrier) && !affected {
            self.svg.line(
                &sid(&["carrier", placed.id()]),
                (cx, cy - half),
                (cx, cy + half),
            );
        }

        if person.has(Status::Verified) {
            let color = self.theme.text_color.clone();
            self.person_text(
                placed,
                (cx + half + 10.0, cy + half - 2.0),
                "*",
                TextStyle::new(18.0, &color).anchor(Anchor::Start),
            );
        }

        if person.has(Status::Proband) || person.has(Status::Consultand) {
            let start = (cx - half - ARROW_LENGTH, cy + half + ARROW_LENGTH);
            let end = (cx - half - 2.0, cy + half + 2.0);
            self.draw_arrow(&sid(&["arrow", placed.id()]), start, end);
            if person.has(Status::Proband) {
                let color = self.theme.text_color.clone();
                self.person_text(
                    placed,
                    (start.0 - 4.0, start.1 + 10.0),
                    "P",
                    TextStyle::new(12.0, &color),
                );
            }
        }

        if let Some(count) = &person.count {
            self.inner_mark(placed, count, &mark_color);
        }

        if person.adoption_bracket {
            self.draw_adoption_brackets(placed);
        }

        let color = self.theme.text_color.clone();
        self.person_text(
            placed,
            (cx + half + 4.0, cy - half - 2.0),
            &placed.node.rank.to_string(),
            TextStyle::new(10.0, &color).anchor(Anchor::Start),
        );

        let start_y = cy + half + 16.0;
        for (idx, line) in annotation_lines(person, self.wrap_chars).iter().enumerate() {
            self.person_text(
                placed,
                (cx, start_y + idx as f32 * ANNOTATION_LINE_HEIGHT),
                line,
                TextStyle::new(self.theme.font_size, &color),
            );
        }
    }

    fn draw_sex_symbol(&mut self, sex: Sex, cx: f32, cy: f32, fill: &str) {
        let size = self.symbol_size;
        let half = size / 2.0;
        let (x, y) = (format!("{}", cx as i32), format!("{}", cy as i32));
        let id = sid(&["sym", sex.code(), &x, &y]);
        match sex {
            Sex::Male => self.svg.rect(&id, cx - half, cy - half, size, fill),
            Sex::Female => self.svg.circle(&id, cx, cy, half, fill),
            Sex::Unknown => self.svg.polygon(
                &id,
                &[(cx, cy - half), (cx + half, cy), (cx, cy + half), (cx - half, cy)],
                fill,
                true,
            ),
        }
    }

    /// Single glyph centered inside the symbol.
    fn inner_mark(&mut self, placed: Placed<'_>, mark: &str, color: &str) {
        self.person_text(
            placed,
            (placed.x(), placed.y() + 4.0),
            mark,
            TextStyle::new(14.0, color),
        );
    }

    fn person_text(&mut self, placed: Placed<'_>, at: (f32, f32), content: &str, style: TextStyle<'_>) {
        let (x, y) = (format!("{}", at.0 as i32), format!("{}", at.1 as i32));
        self.svg
            .text(&sid(&["text", placed.id(), &y, &x]), at.0, at.1, content, style);
    }

    /// Shaft plus an explicit triangular head.
    fn draw_arrow(&mut self, id: &str, start: (f32, f32), end: (f32, f32)) {
        self.svg.line(&format!("{id}_shaft"), start, end);
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let length = dx.hypot(dy);
        if length <= 1e-6 {
            return;
        }
        let (ux, uy) = (dx / length, dy / length);
        let base = (end.0 - ux * ARROW_HEAD_LENGTH, end.1 - uy * ARROW_HEAD_LENGTH);
        let (px, py) = (-uy * ARROW_HEAD_WIDTH / 2.0, ux * ARROW_HEAD_WIDTH / 2.0);
        let fill = self.theme.line_color.clone();
        self.svg.polygon(
            &format!("{id}_head"),
            &[end, (base.0 + px, base.1 + py), (base.0 - px, base.1 - py)],
            &fill,
            false,
        );
    }

    fn draw_adoption_brackets(&mut self, placed: Placed<'_>) {
        let half = self.symbol_size / 2.0;
        let pad = 6.0;
        let cap = 10.0;
        let left = placed.x() - half - pad;
        let right = placed.x() + half + pad;
        let top = placed.y() - half - pad;
        let bottom = placed.y() + half + pad;
        let id = placed.id();

        self.svg.line(&sid(&["adopt", id, "L"]), (left, top), (left, bottom));
        self.svg.line(&sid(&["adopt", id, "R"]), (right, top), (right, bottom));
        self.svg.line(&sid(&["adopt", id, "LT"]), (left, top), (left + cap, top));
        self.svg.line(&sid(&["adopt", id, "LB"]), (left, bottom), (left + cap, bottom));
        self.svg.line(&sid(&["adopt", id, "RT"]), (right - cap, top), (right, top));
        self.svg.line(&sid(&["adopt", id, "RB"]), (right - cap, bottom), (right, bottom));
    }
}
