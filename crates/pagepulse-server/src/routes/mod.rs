pub mod pageviews;
