//! "Top N" lists.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::format::{rating_or_dash, title_with_year, usd_or_dash};
use super::posters::{PosterSize, PosterTemplate};
use crate::api::{FilmId, FilmPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Revenue,
    Rating,
}

impl SortKey {
    fn metric<P: FilmPoint>(&self, point: &P) -> Option<f64> {
        let value = match self {
            SortKey::Revenue => point.revenue(),
            SortKey::Rating => point.rating(),
        };
        value.filter(|v| !v.is_nan())
    }

    pub fn heading(&self) -> &'static str {
        match self {
            SortKey::Revenue => "Top by Revenue",
            SortKey::Rating => "Top by Rating",
        }
    }
}

/// Descending by `key`; missing values sort last. Ties keep input order.
pub fn rank<P: FilmPoint>(points: &[P], key: SortKey, count: usize) -> Vec<P> {
    let mut sorted = points.to_vec();
    // `sort_by` is stable
    sorted.sort_by(|a, b| match (key.metric(a), key.metric(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted.truncate(count);
    sorted
}

/// One card of the top-films grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmCard {
    pub id: FilmId,
    pub rank: usize,
    pub heading: String,
    pub revenue: String,
    pub rating: String,
    pub poster: Option<String>,
    /// Which line carries the "Top" marker.
    pub highlight: SortKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedList {
    pub title: String,
    pub cards: Vec<FilmCard>,
}

impl RankedList {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn build_ranked_list<P: FilmPoint>(
    points: &[P],
    key: SortKey,
    count: usize,
    posters: &PosterTemplate,
) -> RankedList {
    let cards = rank(points, key, count)
        .iter()
        .enumerate()
        .map(|(i, point)| FilmCard {
            id: point.id(),
            rank: i + 1,
            heading: format!("{}. {}", i + 1, title_with_year(point.title(), point.year())),
            revenue: usd_or_dash(point.revenue()),
            rating: rating_or_dash(point.rating()),
            poster: posters.url(point.poster_path(), PosterSize::W185),
            highlight: key,
        })
        .collect();

    RankedList {
        title: key.heading().to_string(),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RatingPoint;

    fn point(id: i64, rating: Option<f64>, revenue: Option<f64>) -> RatingPoint {
        RatingPoint {
            id: FilmId::new(id),
            title: format!("film_{}", id),
            year: Some(2010),
            rating,
            revenue,
            poster_path: Some(format!("/p{}.jpg", id)),
        }
    }

    fn revenues(points: &[RatingPoint]) -> Vec<Option<f64>> {
        points.iter().map(|p| p.revenue).collect()
    }

    #[test]
    fn test_missing_values_sort_last() {
        let points = vec![point(1, None, Some(10.0)), point(2, None, None), point(3, None, Some(50.0))];
        let ranked = rank(&points, SortKey::Revenue, 10);

        assert_eq!(revenues(&ranked), vec![Some(50.0), Some(10.0), None]);
    }

    #[test]
    fn test_ties_keep_input_order_and_truncate() {
        let points = vec![
            point(1, Some(7.0), None),
            point(2, Some(8.0), None),
            point(3, Some(7.0), None),
            point(4, Some(f64::NAN), None),
            point(5, Some(7.0), None),
        ];
        let ranked = rank(&points, SortKey::Rating, 3);
        let ids: Vec<i64> = ranked.iter().map(|p| p.id.value()).collect();

        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_count_larger_than_input() {
        let points = vec![point(1, Some(5.0), Some(1.0))];
        assert_eq!(rank(&points, SortKey::Rating, 12).len(), 1);
        assert!(rank(&points, SortKey::Rating, 0).is_empty());
    }

    #[test]
    fn test_budget_points_by_rating_keep_order() {
        let points = vec![
            crate::api::BudgetPoint {
                id: FilmId::new(1),
                title: "a".into(),
                year: None,
                budget: Some(1.0),
                revenue: Some(1.0),
                poster_path: None,
            },
            crate::api::BudgetPoint {
                id: FilmId::new(2),
                title: "b".into(),
                year: None,
                budget: Some(2.0),
                revenue: Some(2.0),
                poster_path: None,
            },
        ];
        let ranked = rank(&points, SortKey::Rating, 2);
        assert_eq!(ranked[0].id, FilmId::new(1));
    }

    #[test]
    fn test_build_ranked_list_cards() {
        let points = vec![point(1, Some(6.44), Some(0.0)), point(2, None, Some(2_500_000.0))];
        let list = build_ranked_list(&points, SortKey::Revenue, 12, &PosterTemplate::default());

        assert_eq!(list.title, "Top by Revenue");
        assert_eq!(list.cards[0].heading, "1. film_2 (2010)");
        assert_eq!(list.cards[0].revenue, "$2,500,000");
        assert_eq!(list.cards[0].rating, "—");
        assert_eq!(
            list.cards[0].poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w185/p2.jpg")
        );
        assert_eq!(list.cards[1].rank, 2);
        assert_eq!(list.cards[1].revenue, "—");
        assert_eq!(list.cards[1].rating, "6.4");
    }
}
