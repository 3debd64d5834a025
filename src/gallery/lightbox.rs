//! Полноэкранный просмотр снимков.
//!
//! Машина состояний `{closed, open(cursor)}` над полным (не обрезанным
//! до пяти) списком изображений. Курсор ходит по кругу в обе стороны,
//! миниатюры прыгают на произвольный индекс, Esc закрывает. Состояние
//! живёт только пока просмотр открыт.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lightbox {
    #[default]
    Closed,
    Open {
        cursor: usize,
    },
}

impl Lightbox {
    /// Открывает просмотр на снимке `index`; прошлое состояние забывается.
    pub fn open_at(&mut self, index: usize, len: usize) {
        if len == 0 {
            return;
        }
        *self = Lightbox::Open { cursor: index.min(len - 1) };
    }

    /// Шаг вперёд с переходом через конец списка.
    pub fn next(&mut self, len: usize) {
        if let Lightbox::Open { cursor } = self {
            if len > 0 {
                *cursor = (*cursor + 1) % len;
            }
        }
    }

    /// Шаг назад с переходом через начало списка.
    pub fn previous(&mut self, len: usize) {
        if let Lightbox::Open { cursor } = self {
            if len > 0 {
                *cursor = (*cursor + len - 1) % len;
            }
        }
    }

    /// Прыжок на миниатюру `index`.
    pub fn jump(&mut self, index: usize, len: usize) {
        if let Lightbox::Open { .. } = self {
            if index < len {
                *self = Lightbox::Open { cursor: index };
            }
        }
    }

    pub fn close(&mut self) {
        *self = Lightbox::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Lightbox::Open { .. })
    }

    pub fn cursor(&self) -> Option<usize> {
        match self {
            Lightbox::Open { cursor } => Some(*cursor),
            Lightbox::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed_and_reopens() {
        let mut lb = Lightbox::default();
        assert!(!lb.is_open());

        lb.open_at(2, 4);
        assert_eq!(lb.cursor(), Some(2));

        lb.close();
        assert_eq!(lb.cursor(), None);

        // Повторное открытие сбрасывает курсор на новый старт.
        lb.open_at(0, 4);
        assert_eq!(lb.cursor(), Some(0));
    }

    #[test]
    fn next_wraps_from_last_to_first() {
        let mut lb = Lightbox::default();
        lb.open_at(3, 4);
        lb.next(4);
        assert_eq!(lb.cursor(), Some(0));
    }

    #[test]
    fn previous_wraps_from_first_to_last() {
        let mut lb = Lightbox::default();
        lb.open_at(0, 4);
        lb.previous(4);
        assert_eq!(lb.cursor(), Some(3));
    }

    #[test]
    fn jump_moves_cursor_and_ignores_out_of_range() {
        let mut lb = Lightbox::default();
        lb.open_at(0, 6);
        lb.jump(4, 6);
        assert_eq!(lb.cursor(), Some(4));

        lb.jump(6, 6);
        assert_eq!(lb.cursor(), Some(4));
    }

    #[test]
    fn steps_do_nothing_while_closed() {
        let mut lb = Lightbox::default();
        lb.next(4);
        lb.previous(4);
        lb.jump(1, 4);
        assert!(!lb.is_open());
    }

    #[test]
    fn single_image_cycles_onto_itself() {
        let mut lb = Lightbox::default();
        lb.open_at(0, 1);
        lb.next(1);
        assert_eq!(lb.cursor(), Some(0));
        lb.previous(1);
        assert_eq!(lb.cursor(), Some(0));
    }
}
