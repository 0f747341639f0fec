use crate::config::Direction;
use crate::model::Sheet;

/// Render one CSS rule per placement, in placement order.
///
/// Each rule shows its sprite through a `background` shorthand that shifts the
/// sheet by the negated offset along the layout axis:
///
/// ```text
/// .icon.png {
///   background: transparent url(master.png) no-repeat 0 -20px;
///   width: 30px; height: 5px;
/// }
/// ```
///
/// `master_name` is emitted verbatim inside `url(...)`.
pub fn to_css(sheet: &Sheet, master_name: &str) -> String {
    let mut s = String::new();
    for p in &sheet.placements {
        let position = match sheet.direction {
            Direction::Vertical => format!("0 {}px", -p.offset),
            Direction::Horizontal => format!("{}px 0", -p.offset),
        };
        s.push_str(&format!(
            ".{} {{\n  background: transparent url({}) no-repeat {};\n  width: {}px; height: {}px;\n}}\n",
            p.name, master_name, position, p.width, p.height
        ));
    }
    s
}
