//! Built-in word bank.

use crate::rng::GameRng;

pub const WORD_BANK: &[&str] = &[
    "사과", "바나나", "자동차", "비행기", "컴퓨터",
    "책", "연필", "의자", "테이블", "집",
    "나무", "꽃", "태양", "달", "별",
    "강아지", "고양이", "물고기", "새", "토끼",
    "피자", "햄버거", "치킨", "아이스크림", "케이크",
    "축구공", "농구공", "야구", "테니스", "수영",
    "산", "바다", "강", "호수", "섬",
    "우산", "모자", "신발", "가방", "시계",
    "카메라", "전화기", "텔레비전", "냉장고", "세탁기",
    "학교", "병원", "은행", "도서관", "공원",
];

/// Draw `count` distinct candidates from `bank`.
pub fn pick_words<S: AsRef<str>>(rng: &mut GameRng, bank: &[S], count: usize) -> Vec<String> {
    rng.sample(bank, count)
        .into_iter()
        .map(|w| w.as_ref().to_string())
        .collect()
}
