//! Раскладка плиток галереи.
//!
//! Чистая функция от количества снимков: пять фиксированных шаблонов,
//! все размеры в процентах от области просмотра. Ничего не пересчитывается
//! при изменении размеров — те же проценты просто режут новую область.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::MAX_TILES;

/// Одна плитка галереи.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryCell {
    /// Индекс в отображаемом подмножестве (не в полном списке).
    pub index: usize,
    pub area: Rect,
    /// `Some(n)` — на плитке бейдж «+n» о скрытых снимках.
    pub overflow: Option<usize>,
}

fn cell(index: usize, area: Rect) -> GalleryCell {
    GalleryCell { index, area, overflow: None }
}

fn split(area: Rect, direction: Direction, percents: &[u16]) -> Vec<Rect> {
    let constraints: Vec<Constraint> =
        percents.iter().map(|p| Constraint::Percentage(*p)).collect();
    Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Строит непересекающуюся раскладку для `displayed` снимков из `total`.
///
/// Показывается `min(displayed, 5)` плиток; при `total > 5` последняя
/// плитка получает бейдж `total − 5`. Вызывающий гарантирует хотя бы
/// один снимок (пустой набор заменён заглушкой ещё при сборке).
pub fn plan(viewport: Rect, displayed: usize, total: usize) -> Vec<GalleryCell> {
    let count = displayed.clamp(1, MAX_TILES);

    let mut cells = match count {
        1 => vec![cell(0, viewport)],
        2 => {
            let cols = split(viewport, Direction::Horizontal, &[50, 50]);
            vec![cell(0, cols[0]), cell(1, cols[1])]
        }
        3 => {
            // Широкая плитка слева, две стопкой справа.
            let cols = split(viewport, Direction::Horizontal, &[60, 40]);
            let right = split(cols[1], Direction::Vertical, &[50, 50]);
            vec![cell(0, cols[0]), cell(1, right[0]), cell(2, right[1])]
        }
        4 => {
            let cols = split(viewport, Direction::Horizontal, &[50, 50]);
            let right = split(cols[1], Direction::Vertical, &[50, 50]);
            let bottom = split(right[1], Direction::Horizontal, &[50, 50]);
            vec![
                cell(0, cols[0]),
                cell(1, right[0]),
                cell(2, bottom[0]),
                cell(3, bottom[1]),
            ]
        }
        _ => {
            // Половина под обложку, справа сетка 2×2.
            let cols = split(viewport, Direction::Horizontal, &[50, 50]);
            let rows = split(cols[1], Direction::Vertical, &[50, 50]);
            let top = split(rows[0], Direction::Horizontal, &[50, 50]);
            let bottom = split(rows[1], Direction::Horizontal, &[50, 50]);
            vec![
                cell(0, cols[0]),
                cell(1, top[0]),
                cell(2, top[1]),
                cell(3, bottom[0]),
                cell(4, bottom[1]),
            ]
        }
    };

    if total > MAX_TILES {
        if let Some(last) = cells.last_mut() {
            last.overflow = Some(total - MAX_TILES);
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect { x: 0, y: 0, width: 100, height: 40 };

    #[test]
    fn cell_count_matches_min_of_len_and_five() {
        for len in 1..=9usize {
            let cells = plan(VIEWPORT, len.min(MAX_TILES), len);
            assert_eq!(cells.len(), len.min(5), "len = {len}");
            for (i, c) in cells.iter().enumerate() {
                assert_eq!(c.index, i);
            }
        }
    }

    #[test]
    fn cells_tile_viewport_without_overlap() {
        for len in 1..=9usize {
            let cells = plan(VIEWPORT, len.min(MAX_TILES), len);

            let covered: u32 = cells.iter().map(|c| c.area.area()).sum();
            assert_eq!(covered, VIEWPORT.area(), "len = {len}");

            for (i, a) in cells.iter().enumerate() {
                for b in cells.iter().skip(i + 1) {
                    assert!(!a.area.intersects(b.area), "len = {len}: {a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn overflow_badge_iff_more_than_five() {
        for total in 1..=5usize {
            let cells = plan(VIEWPORT, total, total);
            assert!(cells.iter().all(|c| c.overflow.is_none()), "total = {total}");
        }

        let cells = plan(VIEWPORT, 5, 8);
        assert_eq!(cells.last().map(|c| c.overflow), Some(Some(3)));
        assert!(cells[..4].iter().all(|c| c.overflow.is_none()));
    }

    #[test]
    fn single_image_takes_whole_viewport() {
        let cells = plan(VIEWPORT, 1, 1);
        assert_eq!(cells, vec![GalleryCell { index: 0, area: VIEWPORT, overflow: None }]);
    }

    #[test]
    fn three_image_template_is_60_40() {
        let cells = plan(VIEWPORT, 3, 3);
        assert_eq!(cells[0].area.width, 60);
        assert_eq!(cells[0].area.height, 40);
        assert_eq!(cells[1].area.width, 40);
        assert_eq!(cells[1].area.height, 20);
        assert_eq!(cells[2].area.height, 20);
    }
}
