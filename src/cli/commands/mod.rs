pub mod account;
pub mod budget;
pub mod cache;
pub mod city;
pub mod image;
pub mod market;
pub mod plan;
pub mod spotlight;
