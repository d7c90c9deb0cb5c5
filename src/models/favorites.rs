/// Сколько городов помним для одного чата
pub const FAVORITES_CAPACITY: usize = 3;

/// Кольцевой буфер избранных городов.
///
/// Новое имя пишется в позицию `next`, после чего позиция сдвигается по модулю
/// ёмкости, так что при переполнении затирается самая старая запись.
/// Пустая строка означает свободный слот.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    slots: [String; FAVORITES_CAPACITY],
    next: usize,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Восстановление из сохранённых слотов и позиции записи.
    ///
    /// Без позиции (или с позицией вне буфера) пишем в первый пустой слот,
    /// а если всё занято, то в нулевой.
    pub fn from_parts(slots: [String; FAVORITES_CAPACITY], next: Option<usize>) -> Self {
        let next = match next {
            Some(next) if next < FAVORITES_CAPACITY => next,
            _ => slots.iter().position(|slot| slot.is_empty()).unwrap_or(0),
        };
        Self { slots, next }
    }

    pub fn contains(&self, name: &str) -> bool {
        !name.is_empty() && self.slots.iter().any(|slot| slot == name)
    }

    /// Возвращает `false`, если имя пустое или уже есть в списке.
    pub fn push(&mut self, name: &str) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }

        self.slots[self.next] = name.to_string();
        self.next = (self.next + 1) % FAVORITES_CAPACITY;
        true
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.clear();
        }
        self.next = 0;
    }

    pub fn slots(&self) -> &[String; FAVORITES_CAPACITY] {
        &self.slots
    }

    /// Непустые слоты в порядке хранения
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|slot| !slot.is_empty())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(String::is_empty)
    }

    pub fn write_position(&self) -> usize {
        self.next
    }
}
