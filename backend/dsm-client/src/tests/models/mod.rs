mod parallel;
mod product;
mod repository;
mod user;
