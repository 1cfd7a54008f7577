use crate::geometry::{rgb, GeometryBuilder, TileFrame};

pub(super) fn build(frame: &TileFrame, out: &mut GeometryBuilder) {
    let outline = rgb(204, 153, 102);
    let lit = rgb(230, 190, 138);
    let shadow = rgb(179, 134, 89);
    frame.outline(out, outline);

    let base = [
        frame.point(0.2, 0.2),
        frame.point(0.8, 0.2),
        frame.point(0.8, 0.8),
        frame.point(0.2, 0.8),
    ];
    let apex = frame.center() + frame.up(frame.height * 0.9);

    out.polygon(&base, outline);
    // left faces catch the light
    out.line(base[0], apex, lit);
    out.line(base[3], apex, lit);
    out.line(base[1], apex, shadow);
    out.line(base[2], apex, shadow);
}
