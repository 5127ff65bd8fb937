//! Entity 定義
//!
//! 接続・在室状況・質問ログといった、状態を持つドメインオブジェクトを定義します。
//! 状態遷移のルール（色の初期化、質問ステータスの単調性など）はここに集約し、
//! Infrastructure 層のストアはロックと保管だけを担当します。

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use super::{
    error::QuestionError,
    value_object::{
        ClassId, ColorSignal, ConnectionId, QuestionText, RegistrationTimestamp, StudentId,
        Timestamp,
    },
};

/// Identity binding of a connection, fixed at registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub student_id: StudentId,
    pub registered_at: RegistrationTimestamp,
}

/// One live transport channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub opened_at: Timestamp,
    /// Set exactly once, by registration.
    pub binding: Option<Binding>,
    /// Class observed by a teacher dashboard connection.
    pub watching: Option<ClassId>,
}

impl Connection {
    pub fn new(id: ConnectionId, opened_at: Timestamp) -> Self {
        Self {
            id,
            opened_at,
            binding: None,
            watching: None,
        }
    }

    pub fn student_id(&self) -> Option<&StudentId> {
        self.binding.as_ref().map(|b| &b.student_id)
    }
}

/// Per-identity presence state: color signal, live connections and current class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPresence {
    pub color: ColorSignal,
    pub connections: HashSet<ConnectionId>,
    pub class_id: Option<ClassId>,
}

impl StudentPresence {
    /// Whether at least one connection for this identity is still open.
    pub fn is_live(&self) -> bool {
        !self.connections.is_empty()
    }

    /// Drop one connection; the color falls back to `inactive` once no tab is left.
    ///
    /// Returns `true` when this was the last live connection.
    pub fn drop_connection(&mut self, connection_id: &ConnectionId) -> bool {
        let removed = self.connections.remove(connection_id);
        if removed && self.connections.is_empty() {
            self.color = ColorSignal::Inactive;
            return true;
        }
        false
    }
}

/// Membership roster of one class room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRoster {
    pub id: ClassId,
    /// Identities currently associated with the class.
    pub members: HashSet<StudentId>,
    /// Every identity that ever registered to the class.
    pub seen: HashSet<StudentId>,
}

impl ClassRoster {
    pub fn new(id: ClassId) -> Self {
        Self {
            id,
            members: HashSet::new(),
            seen: HashSet::new(),
        }
    }

    pub fn join(&mut self, student_id: StudentId) {
        self.seen.insert(student_id.clone());
        self.members.insert(student_id);
    }

    pub fn leave(&mut self, student_id: &StudentId) -> bool {
        self.members.remove(student_id)
    }

    pub fn is_member(&self, student_id: &StudentId) -> bool {
        self.members.contains(student_id)
    }
}

/// Share of active members per active color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorFractions {
    pub green: f64,
    pub yellow: f64,
    pub red: f64,
}

impl ColorFractions {
    /// Compute fractions from the colors of the active members of one class.
    ///
    /// Members still carrying `inactive` count toward the denominator but toward none of the
    /// buckets, so the three values may sum to less than one. No members yields all zeros.
    pub fn from_active_colors<I>(colors: I) -> Self
    where
        I: IntoIterator<Item = ColorSignal>,
    {
        let (mut total, mut green, mut yellow, mut red) = (0usize, 0usize, 0usize, 0usize);
        for color in colors {
            total += 1;
            match color {
                ColorSignal::Green => green += 1,
                ColorSignal::Yellow => yellow += 1,
                ColorSignal::Red => red += 1,
                ColorSignal::Inactive => {}
            }
        }
        if total == 0 {
            return Self::default();
        }
        let share = |count: usize| count as f64 / total as f64;
        Self {
            green: share(green),
            yellow: share(yellow),
            red: share(red),
        }
    }

    pub fn get(&self, color: ColorSignal) -> f64 {
        match color {
            ColorSignal::Green => self.green,
            ColorSignal::Yellow => self.yellow,
            ColorSignal::Red => self.red,
            ColorSignal::Inactive => 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.green + self.yellow + self.red
    }
}

/// Lifecycle status of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Solved,
    Submitted,
}

impl QuestionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, QuestionStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Solved => "solved",
            QuestionStatus::Submitted => "submitted",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome a teacher can assign to a pending question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Answered in class.
    Solved,
    /// Forwarded to the speaker.
    Submitted,
}

impl From<Resolution> for QuestionStatus {
    fn from(value: Resolution) -> Self {
        match value {
            Resolution::Solved => QuestionStatus::Solved,
            Resolution::Submitted => QuestionStatus::Submitted,
        }
    }
}

/// One entry of a class's question log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub text: QuestionText,
    pub answer: Option<String>,
    pub status: QuestionStatus,
    pub submitted_at: Timestamp,
}

/// Append-only, index-stable question log of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionLog {
    pub class_id: ClassId,
    questions: Vec<Question>,
}

impl QuestionLog {
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            questions: Vec::new(),
        }
    }

    /// Append a pending question and return its index.
    pub fn append(&mut self, text: QuestionText, submitted_at: Timestamp) -> usize {
        self.questions.push(Question {
            text,
            answer: None,
            status: QuestionStatus::Pending,
            submitted_at,
        });
        self.questions.len() - 1
    }

    /// Move a pending question into a terminal status.
    pub fn resolve(
        &mut self,
        index: usize,
        resolution: Resolution,
    ) -> Result<QuestionStatus, QuestionError> {
        let question = self.get_mut(index)?;
        if question.status.is_terminal() {
            return Err(QuestionError::AlreadyTerminal {
                index,
                status: question.status,
            });
        }
        question.status = resolution.into();
        Ok(question.status)
    }

    /// Fill in the answer; status is left untouched.
    pub fn set_answer(&mut self, index: usize, answer: String) -> Result<(), QuestionError> {
        self.get_mut(index)?.answer = Some(answer);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Question, QuestionError> {
        let len = self.questions.len();
        self.questions
            .get_mut(index)
            .ok_or(QuestionError::IndexOutOfRange { index, len })
    }
}

/// Read model of one class, recomputed on every query.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub class_id: ClassId,
    /// Identities ever seen in the class.
    pub student_count: usize,
    pub active_student_count: usize,
    pub color_fractions: ColorFractions,
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_id(value: &str) -> ClassId {
        ClassId::new(value.to_string()).unwrap()
    }

    fn question(value: &str) -> QuestionText {
        QuestionText::new(value.to_string())
    }

    #[test]
    fn test_color_fractions_with_no_active_members() {
        // テスト項目: アクティブな参加者がいない場合、全ての割合が 0 になる
        // given (前提条件):
        let colors: Vec<ColorSignal> = vec![];

        // when (操作):
        let fractions = ColorFractions::from_active_colors(colors);

        // then (期待する結果):
        assert_eq!(fractions, ColorFractions::default());
        assert!(!fractions.green.is_nan());
    }

    #[test]
    fn test_color_fractions_exclude_inactive_from_buckets() {
        // テスト項目: inactive の参加者は分母に含まれるが、どの色にも数えられない
        // given (前提条件):
        let colors = vec![
            ColorSignal::Green,
            ColorSignal::Green,
            ColorSignal::Red,
            ColorSignal::Inactive,
        ];

        // when (操作):
        let fractions = ColorFractions::from_active_colors(colors);

        // then (期待する結果):
        assert_eq!(fractions.green, 0.5);
        assert_eq!(fractions.yellow, 0.0);
        assert_eq!(fractions.red, 0.25);
        assert!(fractions.sum() < 1.0);
    }

    #[test]
    fn test_color_fractions_sum_to_one_when_all_colored() {
        // テスト項目: 全員が色を送信済みなら割合の合計はちょうど 1 になる
        let colors = vec![ColorSignal::Green, ColorSignal::Yellow, ColorSignal::Red];
        let fractions = ColorFractions::from_active_colors(colors);
        assert!((fractions.sum() - 1.0).abs() < f64::EPSILON);
        for color in ColorSignal::ACTIVE {
            let value = fractions.get(color);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_student_presence_last_connection_forces_inactive() {
        // テスト項目: 最後の接続が切れたときだけ色が inactive に戻る
        // given (前提条件):
        let tab1 = ConnectionId::generate();
        let tab2 = ConnectionId::generate();
        let mut presence = StudentPresence {
            color: ColorSignal::Green,
            connections: [tab1, tab2].into_iter().collect(),
            class_id: None,
        };

        // when (操作):
        let first = presence.drop_connection(&tab1);

        // then (期待する結果):
        assert!(!first);
        assert_eq!(presence.color, ColorSignal::Green);

        // when (操作):
        let last = presence.drop_connection(&tab2);

        // then (期待する結果):
        assert!(last);
        assert_eq!(presence.color, ColorSignal::Inactive);
        assert!(!presence.is_live());
    }

    #[test]
    fn test_student_presence_drop_unknown_connection_is_noop() {
        // テスト項目: 未登録の接続を外しても状態は変わらない（冪等性）
        let mut presence = StudentPresence {
            color: ColorSignal::Yellow,
            ..Default::default()
        };
        assert!(!presence.drop_connection(&ConnectionId::generate()));
        assert_eq!(presence.color, ColorSignal::Yellow);
    }

    #[test]
    fn test_class_roster_tracks_seen_after_leave() {
        // テスト項目: 退出しても累計（seen）には残る
        let alice = StudentId::new("alice".to_string()).unwrap();
        let mut roster = ClassRoster::new(class_id("cs50"));
        roster.join(alice.clone());
        assert!(roster.leave(&alice));
        assert!(!roster.is_member(&alice));
        assert_eq!(roster.seen.len(), 1);
    }

    #[test]
    fn test_question_log_indices_are_sequential() {
        // テスト項目: 質問のインデックスは投稿順に 0 から振られる
        // given (前提条件):
        let mut log = QuestionLog::new(class_id("algo101"));

        // when (操作):
        let indices: Vec<usize> = ["q0", "q1", "q2"]
            .iter()
            .map(|q| log.append(question(q), Timestamp::new(0)))
            .collect();

        // then (期待する結果):
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(log.questions().iter().all(|q| q.status == QuestionStatus::Pending));
    }

    #[test]
    fn test_question_log_resolve_only_touches_target() {
        // テスト項目: 指定したインデックスの質問だけが solved になる
        // given (前提条件):
        let mut log = QuestionLog::new(class_id("algo101"));
        for q in ["q0", "q1", "q2"] {
            log.append(question(q), Timestamp::new(0));
        }

        // when (操作):
        let status = log.resolve(1, Resolution::Solved);

        // then (期待する結果):
        assert_eq!(status, Ok(QuestionStatus::Solved));
        let statuses: Vec<QuestionStatus> = log.questions().iter().map(|q| q.status).collect();
        assert_eq!(
            statuses,
            vec![
                QuestionStatus::Pending,
                QuestionStatus::Solved,
                QuestionStatus::Pending
            ]
        );
    }

    #[test]
    fn test_question_log_terminal_status_never_changes() {
        // テスト項目: 終端状態の質問はそれ以上遷移しない
        // given (前提条件):
        let mut log = QuestionLog::new(class_id("algo101"));
        log.append(question("q0"), Timestamp::new(0));
        log.resolve(0, Resolution::Submitted).unwrap();

        // when (操作):
        let result = log.resolve(0, Resolution::Solved);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(QuestionError::AlreadyTerminal {
                index: 0,
                status: QuestionStatus::Submitted
            })
        );
        assert_eq!(log.get(0).unwrap().status, QuestionStatus::Submitted);
    }

    #[test]
    fn test_question_log_out_of_range() {
        // テスト項目: 範囲外のインデックスはエラーになり、ログは変化しない
        let mut log = QuestionLog::new(class_id("algo101"));
        log.append(question("q0"), Timestamp::new(0));
        log.append(question("q1"), Timestamp::new(0));

        let result = log.resolve(99, Resolution::Solved);

        assert_eq!(result, Err(QuestionError::IndexOutOfRange { index: 99, len: 2 }));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_question_log_set_answer_keeps_status() {
        let mut log = QuestionLog::new(class_id("algo101"));
        log.append(question("what is a heap?"), Timestamp::new(0));

        log.set_answer(0, "a priority queue".to_string()).unwrap();

        let q = log.get(0).unwrap();
        assert_eq!(q.answer.as_deref(), Some("a priority queue"));
        assert_eq!(q.status, QuestionStatus::Pending);
    }
}
