//! 訪問アイテムのレコードストア
//!
//! 追加順に並ぶアイテム列。識別は位置（インデックス）のみで、
//! 削除・並べ替えは提供しない。

use crate::error::{Error, Result};
use crate::types::{Category, VisitItem};

/// カメラ撮影時の元ファイル名
pub const CAMERA_SOURCE_NAME: &str = "camera_photo.png";

#[derive(Debug, Clone, Default)]
pub struct VisitItemStore {
    items: Vec<VisitItem>,
}

impl VisitItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイル選択から追加。追加位置を返す
    pub fn add_from_upload(&mut self, source_name: impl Into<String>, image: Vec<u8>) -> usize {
        self.push(VisitItem::new(source_name, image))
    }

    /// カメラ撮影から追加。追加位置を返す
    pub fn add_from_camera(&mut self, image: Vec<u8>) -> usize {
        self.push(VisitItem::new(CAMERA_SOURCE_NAME, image))
    }

    pub fn push(&mut self, item: VisitItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VisitItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VisitItem> {
        self.items.iter()
    }

    pub fn set_plot(&mut self, index: usize, plot: impl Into<String>) -> Result<()> {
        self.item_mut(index)?.plot = plot.into();
        Ok(())
    }

    /// カテゴリを置き換える（重複は集合で吸収）
    pub fn set_categories<I>(&mut self, index: usize, categories: I) -> Result<()>
    where
        I: IntoIterator<Item = Category>,
    {
        self.item_mut(index)?.categories = categories.into_iter().collect();
        Ok(())
    }

    pub fn set_notes(&mut self, index: usize, notes: impl Into<String>) -> Result<()> {
        self.item_mut(index)?.notes = notes.into();
        Ok(())
    }

    pub fn set_recommendations(
        &mut self,
        index: usize,
        recommendations: impl Into<String>,
    ) -> Result<()> {
        self.item_mut(index)?.recommendations = recommendations.into();
        Ok(())
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut VisitItem> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(Error::ItemOutOfRange { index, len })
    }
}

impl<'a> IntoIterator for &'a VisitItemStore {
    type Item = &'a VisitItem;
    type IntoIter = std::slice::Iter<'a, VisitItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
