/// One answer slot per question index, unset until answered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerTracker {
    slots: Vec<Option<usize>>,
}

impl AnswerTracker {
    pub fn new(question_count: usize) -> Self {
        Self {
            slots: vec![None; question_count],
        }
    }

    /// Overwrites whatever was stored for `question`. Out-of-range indexes are
    /// ignored.
    pub fn set(&mut self, question: usize, option: usize) {
        if let Some(slot) = self.slots.get_mut(question) {
            *slot = Some(option);
        }
    }

    pub fn get(&self, question: usize) -> Option<usize> {
        self.slots.get(question).copied().flatten()
    }

    pub fn is_answered(&self, question: usize) -> bool {
        self.get(question).is_some()
    }

    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset() {
        let t = AnswerTracker::new(3);
        assert_eq!(t.len(), 3);
        assert_eq!(t.answered_count(), 0);
        assert!(!t.is_answered(0));
        assert_eq!(t.get(2), None);
    }

    #[test]
    fn set_overwrites_previous_answer() {
        let mut t = AnswerTracker::new(2);
        t.set(1, 0);
        t.set(1, 3);
        assert_eq!(t.get(1), Some(3));
        assert_eq!(t.answered_count(), 1);
    }

    #[test]
    fn same_value_twice_is_stable() {
        let mut t = AnswerTracker::new(2);
        t.set(0, 1);
        let before = t.clone();
        t.set(0, 1);
        assert_eq!(t, before);
    }

    #[test]
    fn out_of_range_question_is_ignored() {
        let mut t = AnswerTracker::new(1);
        t.set(5, 0);
        assert_eq!(t.answered_count(), 0);
        assert_eq!(t.get(5), None);
    }
}
