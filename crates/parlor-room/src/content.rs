//! Static content the mini-games sample from.
//!
//! The room never edits these lists; it only draws from them. The default
//! pack is the built-in Vietnamese set. Operators can swap in their own with
//! [`ContentPack::from_json`].

use serde::{Deserialize, Serialize};

use crate::RoomError;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    pub question: String,
    pub answers: Vec<String>,
    /// Index into `answers`.
    pub correct: usize,
}

/// Words to draw, quiz questions, and spy locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPack {
    pub words: Vec<String>,
    pub questions: Vec<TriviaQuestion>,
    pub locations: Vec<String>,
}

impl ContentPack {
    /// Parses and validates a pack from JSON.
    pub fn from_json(data: &[u8]) -> Result<Self, RoomError> {
        let pack: Self = serde_json::from_slice(data)
            .map_err(|e| RoomError::InvalidContent(e.to_string()))?;
        pack.validate()?;
        Ok(pack)
    }

    /// Checks that every list can be sampled from.
    ///
    /// # Errors
    /// [`RoomError::InvalidContent`] for an empty list, a blank word, or a
    /// question whose `correct` index is out of range.
    pub fn validate(&self) -> Result<(), RoomError> {
        if self.words.is_empty() {
            return Err(RoomError::InvalidContent("word list is empty".into()));
        }
        if self.words.iter().any(|w| w.trim().is_empty()) {
            return Err(RoomError::InvalidContent("word list has a blank word".into()));
        }
        if self.questions.is_empty() {
            return Err(RoomError::InvalidContent("question bank is empty".into()));
        }
        if let Some(q) = self
            .questions
            .iter()
            .find(|q| q.correct >= q.answers.len())
        {
            return Err(RoomError::InvalidContent(format!(
                "question {:?} has correct index {} but {} answers",
                q.question,
                q.correct,
                q.answers.len()
            )));
        }
        if self.locations.is_empty() {
            return Err(RoomError::InvalidContent("location list is empty".into()));
        }
        Ok(())
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self {
            words: DRAW_WORDS.iter().map(|w| w.to_string()).collect(),
            questions: TRIVIA
                .iter()
                .map(|(question, answers, correct)| TriviaQuestion {
                    question: question.to_string(),
                    answers: answers.iter().map(|a| a.to_string()).collect(),
                    correct: *correct,
                })
                .collect(),
            locations: SPY_LOCATIONS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

const DRAW_WORDS: &[&str] = &[
    "mèo", "chó", "nhà", "xe hơi", "cây", "hoa", "mặt trời", "mặt trăng", "sao",
    "máy bay", "tàu thủy", "xe đạp", "tivi", "điện thoại", "máy tính", "sách",
    "bàn", "ghế", "cửa sổ", "cửa", "ô tô", "bánh mì", "cà phê", "trà", "nước",
    "cá", "chim", "bướm", "con ong", "con bò", "con gà", "con vịt", "táo", "cam",
    "chuối", "dưa hấu", "nho", "dâu", "kem", "kẹo", "bánh ngọt", "pizza",
];

const TRIVIA: &[(&str, [&str; 4], usize)] = &[
    (
        "Thủ đô của Việt Nam là gì?",
        ["Hà Nội", "Hồ Chí Minh", "Đà Nẵng", "Hải Phòng"],
        0,
    ),
    (
        "Ngôn ngữ lập trình nào được sử dụng cho web frontend?",
        ["Python", "Java", "JavaScript", "C++"],
        2,
    ),
    (
        "Ai là người phát minh ra bóng đèn?",
        ["Tesla", "Edison", "Einstein", "Newton"],
        1,
    ),
    (
        "Hành tinh nào lớn nhất trong hệ mặt trời?",
        ["Trái Đất", "Sao Hỏa", "Sao Mộc", "Sao Thổ"],
        2,
    ),
    ("2 + 2 x 2 = ?", ["6", "8", "4", "10"], 0),
    (
        "HTML viết tắt của gì?",
        [
            "Hyper Text Markup Language",
            "High Tech Modern Language",
            "Home Tool Markup Language",
            "Hyperlinks and Text Markup Language",
        ],
        0,
    ),
    (
        "Đại dương nào lớn nhất thế giới?",
        ["Đại Tây Dương", "Ấn Độ Dương", "Thái Bình Dương", "Bắc Băng Dương"],
        2,
    ),
    ("Trong năm có bao nhiêu ngày?", ["364", "365", "366", "360"], 1),
    (
        "Nước nào có dân số đông nhất thế giới?",
        ["Ấn Độ", "Trung Quốc", "Mỹ", "Indonesia"],
        0,
    ),
    (
        "CSS dùng để làm gì?",
        ["Xử lý logic", "Tạo cơ sở dữ liệu", "Trang trí web", "Viết server"],
        2,
    ),
];

const SPY_LOCATIONS: &[&str] = &[
    "Nhà hàng", "Bệnh viện", "Trường học", "Siêu thị", "Công viên",
    "Rạp chiếu phim", "Sân bay", "Bến xe", "Bãi biển", "Khách sạn",
    "Thư viện", "Phòng gym", "Ngân hàng", "Cửa hàng cà phê", "Văn phòng",
];
